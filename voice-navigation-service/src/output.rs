use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::events::VoiceEvent;
use crate::locale::LocaleStore;
use crate::providers::SpeechSynthesizer;
use crate::speech::{SpeechOutcome, Utterance};

struct InFlight {
    id: Uuid,
    cancel: CancellationToken,
}

/// Text-to-speech front end enforcing at most one utterance in flight.
///
/// Every `speak` cancels whatever is playing before submitting the new
/// utterance, and binds the utterance to the locale active at call time.
pub struct SpeechOutputEngine {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    locale: Arc<LocaleStore>,
    available: bool,
    enabled: AtomicBool,
    in_flight: Arc<Mutex<Option<InFlight>>>,
    events: broadcast::Sender<VoiceEvent>,
}

impl SpeechOutputEngine {
    /// Probes the synthesizer once; an unavailable platform stays unavailable
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        locale: Arc<LocaleStore>,
        events: broadcast::Sender<VoiceEvent>,
    ) -> Self {
        let available = synthesizer.is_available();
        if !available {
            debug!("Speech synthesis unavailable, output disabled");
        }

        Self {
            synthesizer,
            locale,
            available,
            enabled: AtomicBool::new(false),
            in_flight: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turning output off silences the current utterance
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Cancel the utterance in flight, if any
    pub fn cancel(&self) {
        if let Some(previous) = self.in_flight.lock().take() {
            debug!(utterance_id = %previous.id, "Cancelling utterance");
            previous.cancel.cancel();
        }
    }

    /// Speak `text` in the current locale, interrupting anything already playing.
    ///
    /// Returns the id of the submitted utterance, or `None` when output is
    /// disabled, unavailable, or there is no runtime to drive playback.
    pub fn speak(&self, text: &str) -> Option<Uuid> {
        if !self.available || !self.is_enabled() {
            return None;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime, dropping utterance");
                return None;
            }
        };

        let utterance = Utterance::new(text, self.locale.get_locale());
        let cancel = CancellationToken::new();
        let id = utterance.id;

        {
            let mut slot = self.in_flight.lock();
            if let Some(previous) = slot.take() {
                debug!(utterance_id = %previous.id, "Interrupting utterance");
                previous.cancel.cancel();
            }
            *slot = Some(InFlight {
                id,
                cancel: cancel.clone(),
            });
        }

        debug!(utterance_id = %id, locale = %utterance.locale, "Speaking");
        let _ = self.events.send(VoiceEvent::UtteranceStarted {
            utterance_id: id,
            text: utterance.text.clone(),
            locale: utterance.locale,
        });

        let synthesizer = Arc::clone(&self.synthesizer);
        let in_flight = Arc::clone(&self.in_flight);
        let events = self.events.clone();

        handle.spawn(async move {
            let outcome = if cancel.is_cancelled() {
                SpeechOutcome::Cancelled
            } else {
                let outcome = synthesizer.speak(&utterance, cancel.clone()).await;
                if cancel.is_cancelled() {
                    SpeechOutcome::Cancelled
                } else {
                    outcome
                }
            };

            {
                let mut slot = in_flight.lock();
                if slot.as_ref().is_some_and(|current| current.id == utterance.id) {
                    slot.take();
                }
            }

            if let SpeechOutcome::Failed(reason) = &outcome {
                warn!(utterance_id = %utterance.id, reason = %reason, "Speech synthesis failed");
            }
            let _ = events.send(VoiceEvent::UtteranceFinished {
                utterance_id: utterance.id,
                outcome,
            });
        });

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{LocaleCatalog, MemoryPreferenceStore};
    use crate::providers::scripted::ScriptedSynthesizer;
    use crate::providers::unavailable::NoSpeechSupport;

    fn locale_store() -> Arc<LocaleStore> {
        Arc::new(LocaleStore::open(
            Arc::new(MemoryPreferenceStore::new()),
            Arc::new(LocaleCatalog::builtin().unwrap()),
        ))
    }

    #[test]
    fn test_speak_without_runtime_is_noop() {
        let (events, _) = broadcast::channel(8);
        let engine = SpeechOutputEngine::new(Arc::new(ScriptedSynthesizer::new()), locale_store(), events);
        engine.set_enabled(true);
        assert_eq!(engine.speak("hello"), None);
        assert!(!engine.is_speaking());
    }

    #[tokio::test]
    async fn test_unavailable_platform_never_speaks() {
        let (events, _) = broadcast::channel(8);
        let engine = SpeechOutputEngine::new(Arc::new(NoSpeechSupport), locale_store(), events);
        engine.set_enabled(true);
        assert!(!engine.is_available());
        assert_eq!(engine.speak("hello"), None);
    }

    #[tokio::test]
    async fn test_utterance_uses_current_locale() {
        let (events, mut rx) = broadcast::channel(8);
        let locale = locale_store();
        let synth = Arc::new(ScriptedSynthesizer::auto_complete());
        let engine = SpeechOutputEngine::new(synth.clone(), Arc::clone(&locale), events);
        engine.set_enabled(true);

        locale.set_locale("ta");
        let id = engine.speak("வணக்கம்").unwrap();

        loop {
            if let VoiceEvent::UtteranceFinished { utterance_id, outcome } = rx.recv().await.unwrap() {
                assert_eq!(utterance_id, id);
                assert_eq!(outcome, SpeechOutcome::Completed);
                break;
            }
        }
        assert_eq!(synth.spoken()[0].speech_tag(), "ta-IN");
        assert!(!engine.is_speaking());
    }
}
