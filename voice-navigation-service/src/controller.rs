//! The voice session state machine.
//!
//! `VoiceSessionController` owns enablement, runs at most one recognition
//! session, hands transcripts to the interpreter and routes the resulting
//! intent either to the navigator or back out as spoken feedback.

use logger_redacted::PiiRedactor;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::VoiceConfig;
use crate::error::SessionError;
use crate::events::{VoiceEvent, EVENT_BUFFER};
use crate::input::SpeechInputEngine;
use crate::interpreter::{CommandIntent, CommandInterpreter};
use crate::locale::{LocaleCode, LocaleStore};
use crate::navigation::{Navigator, Route};
use crate::output::SpeechOutputEngine;
use crate::providers::{SpeechRecognizer, SpeechSynthesizer};
use crate::speech::{RecognitionResult, RecognitionSession};

/// Observable state of the voice layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceSessionState {
    Disabled,
    Idle,
    Listening,
    Speaking,
}

impl fmt::Display for VoiceSessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VoiceSessionState::Disabled => "disabled",
            VoiceSessionState::Idle => "idle",
            VoiceSessionState::Listening => "listening",
            VoiceSessionState::Speaking => "speaking",
        };
        f.write_str(name)
    }
}

/// Collaborators the controller is built from
pub struct VoiceParts {
    pub locale: Arc<LocaleStore>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub navigator: Arc<dyn Navigator>,
    pub interpreter: CommandInterpreter,
    pub redactor: PiiRedactor,
}

impl VoiceParts {
    /// Interpreter keywords come from the locale catalog; transcripts are
    /// redacted with the default PII rules before logging
    pub fn new(
        locale: Arc<LocaleStore>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        recognizer: Arc<dyn SpeechRecognizer>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let interpreter = CommandInterpreter::from_catalog(locale.catalog());
        Self {
            locale,
            synthesizer,
            recognizer,
            navigator,
            interpreter,
            redactor: PiiRedactor::default(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: CommandInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_redactor(mut self, redactor: PiiRedactor) -> Self {
        self.redactor = redactor;
        self
    }
}

#[derive(Default)]
struct SessionCore {
    enabled: bool,
    listening: Option<RecognitionSession>,
    transcript: String,
}

struct Inner {
    config: VoiceConfig,
    locale: Arc<LocaleStore>,
    output: SpeechOutputEngine,
    input: SpeechInputEngine,
    interpreter: CommandInterpreter,
    navigator: Arc<dyn Navigator>,
    session: Mutex<SessionCore>,
    events: broadcast::Sender<VoiceEvent>,
    redactor: PiiRedactor,
}

/// Process-wide voice service handed to UI collaborators. Cloning is cheap
/// and every clone drives the same state machine.
#[derive(Clone)]
pub struct VoiceSessionController {
    inner: Arc<Inner>,
}

impl VoiceSessionController {
    pub fn init(parts: VoiceParts, config: VoiceConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let output = SpeechOutputEngine::new(parts.synthesizer, Arc::clone(&parts.locale), events.clone());
        let input = SpeechInputEngine::new(parts.recognizer, Arc::clone(&parts.locale), config.recognition_timeout());

        let enabled = config.voice_enabled;
        output.set_enabled(enabled);

        info!(
            locale = %parts.locale.get_locale(),
            voice_enabled = enabled,
            can_speak = output.is_available(),
            can_listen = input.is_available(),
            "Voice session controller initialized"
        );

        Self {
            inner: Arc::new(Inner {
                config,
                locale: parts.locale,
                output,
                input,
                interpreter: parts.interpreter,
                navigator: parts.navigator,
                session: Mutex::new(SessionCore {
                    enabled,
                    ..SessionCore::default()
                }),
                events,
                redactor: parts.redactor,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VoiceEvent> {
        self.inner.events.subscribe()
    }

    pub fn state(&self) -> VoiceSessionState {
        let core = self.inner.session.lock();
        if !core.enabled {
            VoiceSessionState::Disabled
        } else if core.listening.is_some() {
            VoiceSessionState::Listening
        } else if self.inner.output.is_speaking() {
            VoiceSessionState::Speaking
        } else {
            VoiceSessionState::Idle
        }
    }

    pub fn is_voice_enabled(&self) -> bool {
        self.inner.session.lock().enabled
    }

    pub fn is_listening(&self) -> bool {
        self.inner.session.lock().listening.is_some()
    }

    /// Last recognized transcript; only overwritten by a new successful result
    pub fn transcript(&self) -> String {
        self.inner.session.lock().transcript.clone()
    }

    pub fn can_speak(&self) -> bool {
        self.inner.output.is_available()
    }

    pub fn can_listen(&self) -> bool {
        self.inner.input.is_available()
    }

    /// Flip between Disabled and Idle.
    ///
    /// Disabling works from any state: an open session is cancelled and its
    /// late terminal result is ignored. Enabling announces itself.
    pub fn toggle_voice(&self) {
        let (enabled, orphaned) = {
            let mut core = self.inner.session.lock();
            core.enabled = !core.enabled;
            let orphaned = if core.enabled { None } else { core.listening.take() };
            (core.enabled, orphaned)
        };

        if let Some(session) = orphaned {
            self.inner.input.abandon_session(session.id);
        }

        self.inner.output.set_enabled(enabled);

        if enabled {
            info!("Voice navigation enabled");
            self.emit(VoiceEvent::StateChanged {
                state: VoiceSessionState::Idle,
            });
            let announcement = format!("{} {}", self.translate("voiceNavigation"), self.translate("enabled"));
            self.inner.output.speak(&announcement);
        } else {
            info!("Voice navigation disabled");
            self.emit(VoiceEvent::StateChanged {
                state: VoiceSessionState::Disabled,
            });
        }
    }

    /// Open a recognition session. A no-op while disabled or already listening.
    pub fn start_listening(&self) {
        let mut core = self.inner.session.lock();

        if !core.enabled {
            debug!("Ignoring start_listening while voice is disabled");
            return;
        }
        if core.listening.is_some() {
            debug!("Ignoring start_listening, a session is already open");
            return;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let started = self.inner.input.start_session(move |session, result| {
            if let Some(inner) = weak.upgrade() {
                VoiceSessionController { inner }.finish_session(session, result);
            }
        });

        let session = match started {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Could not start listening");
                return;
            }
        };

        core.listening = Some(session.clone());
        drop(core);

        self.emit(VoiceEvent::ListeningStarted { session });
        self.emit(VoiceEvent::StateChanged {
            state: VoiceSessionState::Listening,
        });

        if self.inner.config.announce_listening {
            self.inner.output.speak(&self.translate("listening"));
        }
    }

    /// Ask the open session to end early; the state returns to Idle when its
    /// terminal result arrives, not here
    pub fn stop_listening(&self) {
        let session_id = self.inner.session.lock().listening.as_ref().map(|s| s.id);
        match session_id {
            Some(id) => {
                self.inner.input.stop_session(id);
            }
            None => debug!("Ignoring stop_listening, no session is open"),
        }
    }

    /// Speak feedback in the current locale; ignored while disabled
    pub fn speak(&self, text: &str) -> Option<Uuid> {
        if !self.is_voice_enabled() {
            return None;
        }
        self.inner.output.speak(text)
    }

    pub fn translate(&self, key: &str) -> String {
        self.inner.locale.translate(key)
    }

    pub fn get_locale(&self) -> LocaleCode {
        self.inner.locale.get_locale()
    }

    /// Switch locale; unsupported codes are ignored and return false.
    /// Only sessions and utterances started afterwards use the new locale.
    pub fn set_locale(&self, code: &str) -> bool {
        if !self.inner.locale.set_locale(code) {
            return false;
        }
        self.emit(VoiceEvent::LocaleChanged {
            locale: self.get_locale(),
        });
        true
    }

    /// Language switcher: change locale and confirm it aloud in the new language
    pub fn select_language(&self, code: &str) -> bool {
        if !self.set_locale(code) {
            return false;
        }
        let locale = self.get_locale();
        let confirmation = format!("{} {}", self.translate("languageChanged"), locale.native_name());
        self.speak(&confirmation);
        true
    }

    /// Cancel everything in flight and return to a fresh Disabled state
    pub fn reset(&self) {
        let orphaned = {
            let mut core = self.inner.session.lock();
            let orphaned = core.listening.take();
            *core = SessionCore::default();
            orphaned
        };

        if let Some(session) = orphaned {
            self.inner.input.abandon_session(session.id);
        }
        self.inner.output.set_enabled(false);

        debug!("Voice session controller reset");
        self.emit(VoiceEvent::StateChanged {
            state: VoiceSessionState::Disabled,
        });
    }

    pub fn locale_store(&self) -> &Arc<LocaleStore> {
        &self.inner.locale
    }

    fn finish_session(&self, session: RecognitionSession, result: RecognitionResult) {
        let recognized = {
            let mut core = self.inner.session.lock();
            if core.listening.as_ref().map(|s| s.id) != Some(session.id) {
                debug!(session_id = %session.id, "Ignoring terminal result of an abandoned session");
                return;
            }
            core.listening = None;

            if let Ok(transcript) = &result {
                core.transcript = transcript.clone();
            }
            result
        };

        self.emit(VoiceEvent::StateChanged {
            state: VoiceSessionState::Idle,
        });

        let transcript = match recognized {
            Ok(transcript) => transcript,
            Err(SessionError::Cancelled) => {
                debug!(session_id = %session.id, "Listening cancelled");
                return;
            }
            Err(reason) => {
                warn!(session_id = %session.id, reason = %reason, "Listening ended without a transcript");
                self.emit(VoiceEvent::SessionFailed {
                    session_id: session.id,
                    reason,
                });
                return;
            }
        };

        let intent = self.inner.interpreter.interpret(&transcript, session.locale);
        info!(
            session_id = %session.id,
            locale = %session.locale,
            transcript = %self.inner.redactor.redact(&transcript),
            intent = ?intent,
            "Voice command recognized"
        );
        self.emit(VoiceEvent::TranscriptRecognized {
            session_id: session.id,
            transcript,
            intent: intent.clone(),
        });

        self.dispatch(intent);
    }

    fn dispatch(&self, intent: CommandIntent) {
        if let Some(route) = Route::from_intent(&intent) {
            self.inner.navigator.navigate(&route);
            self.emit(VoiceEvent::Navigated { route });
            return;
        }

        let key = match intent {
            CommandIntent::RequestHelp => "speakToNavigate",
            _ => "didNotUnderstand",
        };
        self.speak(&self.translate(key));
    }

    fn emit(&self, event: VoiceEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }
}

impl fmt::Debug for VoiceSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceSessionController")
            .field("state", &self.state())
            .field("locale", &self.get_locale())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{LocaleCatalog, MemoryPreferenceStore};
    use crate::providers::scripted::{RecordingNavigator, ScriptedRecognizer, ScriptedSynthesizer};
    use crate::providers::unavailable::NoSpeechSupport;

    fn controller_with(synth: Arc<dyn SpeechSynthesizer>, recognizer: Arc<dyn SpeechRecognizer>) -> VoiceSessionController {
        let locale = Arc::new(LocaleStore::open(
            Arc::new(MemoryPreferenceStore::new()),
            Arc::new(LocaleCatalog::builtin().unwrap()),
        ));
        let parts = VoiceParts::new(locale, synth, recognizer, Arc::new(RecordingNavigator::new()));
        VoiceSessionController::init(parts, VoiceConfig::default())
    }

    #[test]
    fn test_starts_disabled() {
        let controller = controller_with(Arc::new(ScriptedSynthesizer::new()), Arc::new(ScriptedRecognizer::new()));
        assert_eq!(controller.state(), VoiceSessionState::Disabled);
        assert!(!controller.is_listening());
        assert_eq!(controller.transcript(), "");
    }

    #[test]
    fn test_start_listening_while_disabled_is_noop() {
        let controller = controller_with(Arc::new(ScriptedSynthesizer::new()), Arc::new(ScriptedRecognizer::new()));
        controller.start_listening();
        assert!(!controller.is_listening());
        assert_eq!(controller.state(), VoiceSessionState::Disabled);
    }

    #[tokio::test]
    async fn test_unavailable_platform_stays_idle() {
        let controller = controller_with(Arc::new(NoSpeechSupport), Arc::new(NoSpeechSupport));
        assert!(!controller.can_speak());
        assert!(!controller.can_listen());

        controller.toggle_voice();
        controller.start_listening();
        assert_eq!(controller.state(), VoiceSessionState::Idle);
        assert_eq!(controller.speak("hello"), None);
    }

    #[test]
    fn test_state_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&VoiceSessionState::Listening).unwrap(), "\"listening\"");
        assert_eq!(VoiceSessionState::Speaking.to_string(), "speaking");
    }

    #[test]
    fn test_invalid_language_is_ignored() {
        let controller = controller_with(Arc::new(ScriptedSynthesizer::new()), Arc::new(ScriptedRecognizer::new()));
        assert!(!controller.select_language("fr"));
        assert_eq!(controller.get_locale(), LocaleCode::En);
    }
}
