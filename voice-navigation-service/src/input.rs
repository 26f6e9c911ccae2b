use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SessionError, VoiceError, VoiceResult};
use crate::locale::LocaleStore;
use crate::providers::SpeechRecognizer;
use crate::speech::{RecognitionOutcome, RecognitionRequest, RecognitionResult, RecognitionSession};

struct ActiveSession {
    id: Uuid,
    cancel: CancellationToken,
}

/// Speech-to-text front end allowing one single-shot session at a time.
///
/// Each session delivers exactly one terminal result to its callback, whether
/// the platform answered, failed, was stopped, or hit the timeout.
pub struct SpeechInputEngine {
    recognizer: Arc<dyn SpeechRecognizer>,
    locale: Arc<LocaleStore>,
    available: bool,
    timeout: Option<Duration>,
    active: Arc<Mutex<Option<ActiveSession>>>,
}

impl SpeechInputEngine {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, locale: Arc<LocaleStore>, timeout: Option<Duration>) -> Self {
        let available = recognizer.is_available();
        if !available {
            debug!("Speech recognition unavailable, input disabled");
        }

        Self {
            recognizer,
            locale,
            available,
            timeout,
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Open a session bound to the current locale.
    ///
    /// `on_terminal` runs exactly once, from the runtime, when the session ends.
    /// Fails without side effects when recognition is unavailable, a session is
    /// already open, or no runtime is running.
    pub fn start_session<F>(&self, on_terminal: F) -> VoiceResult<RecognitionSession>
    where
        F: FnOnce(RecognitionSession, RecognitionResult) + Send + 'static,
    {
        if !self.available {
            return Err(VoiceError::CapabilityUnavailable("speech recognition"));
        }

        let handle = tokio::runtime::Handle::try_current().map_err(|_| VoiceError::NoRuntime)?;

        let session = RecognitionSession::new(self.locale.get_locale());
        let cancel = CancellationToken::new();

        {
            let mut slot = self.active.lock();
            if slot.is_some() {
                return Err(VoiceError::SessionActive);
            }
            *slot = Some(ActiveSession {
                id: session.id,
                cancel: cancel.clone(),
            });
        }

        let request = RecognitionRequest::single_shot(&session);
        info!(session_id = %session.id, locale = %session.locale, "Recognition session opened");

        let recognizer = Arc::clone(&self.recognizer);
        let active = Arc::clone(&self.active);
        let timeout = self.timeout;
        let terminal_session = session.clone();

        handle.spawn(async move {
            let outcome = match timeout {
                Some(limit) => {
                    tokio::select! {
                        outcome = recognizer.recognize(&request, cancel.clone()) => outcome,
                        _ = tokio::time::sleep(limit) => {
                            warn!(session_id = %request.session_id, timeout = ?limit, "Recognition timed out");
                            cancel.cancel();
                            RecognitionOutcome::Failed(SessionError::Timeout)
                        }
                    }
                }
                None => recognizer.recognize(&request, cancel.clone()).await,
            };

            let result = outcome.into_result(cancel.is_cancelled());

            {
                let mut slot = active.lock();
                if slot.as_ref().is_some_and(|current| current.id == terminal_session.id) {
                    slot.take();
                }
            }

            match &result {
                Ok(_) => debug!(session_id = %terminal_session.id, "Recognition produced a transcript"),
                Err(reason) => debug!(session_id = %terminal_session.id, reason = %reason, "Recognition ended without a transcript"),
            }

            on_terminal(terminal_session, result);
        });

        Ok(session)
    }

    /// Request early cancellation of `session_id`; the terminal callback still
    /// fires once. Returns false when that session is not the open one.
    pub fn stop_session(&self, session_id: Uuid) -> bool {
        let slot = self.active.lock();
        match slot.as_ref() {
            Some(current) if current.id == session_id => {
                debug!(session_id = %session_id, "Stopping recognition session");
                current.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Cancel `session_id` and free the slot at once, so a new session can
    /// open before the abandoned one has wound down. Its terminal callback
    /// still fires once. Returns false when that session is not the open one.
    pub fn abandon_session(&self, session_id: Uuid) -> bool {
        let mut slot = self.active.lock();
        match slot.take() {
            Some(current) if current.id == session_id => {
                debug!(session_id = %session_id, "Abandoning recognition session");
                current.cancel.cancel();
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }
}
