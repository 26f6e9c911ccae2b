//! Deterministic in-memory speech platform.
//!
//! Nothing here touches audio hardware: utterances are recorded and stay
//! "playing" until finished by hand (or finish at once in auto-complete
//! mode), and recognition sessions stay open until a transcript or error is
//! fed in. Used by the integration tests and the `voice-console` binary.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::{SpeechRecognizer, SpeechSynthesizer};
use crate::navigation::{Navigator, Route};
use crate::speech::{RecognitionOutcome, RecognitionRequest, SpeechOutcome, Utterance};

pub struct ScriptedSynthesizer {
    available: bool,
    auto_complete: bool,
    spoken: Mutex<Vec<Utterance>>,
    pending: Mutex<Option<(Uuid, oneshot::Sender<SpeechOutcome>)>>,
    submitted: Notify,
}

impl ScriptedSynthesizer {
    /// Utterances play until [`finish_current`](Self::finish_current) or cancellation
    pub fn new() -> Self {
        Self::build(true, false)
    }

    /// Utterances complete as soon as they are submitted
    pub fn auto_complete() -> Self {
        Self::build(true, true)
    }

    pub fn unavailable() -> Self {
        Self::build(false, true)
    }

    fn build(available: bool, auto_complete: bool) -> Self {
        Self {
            available,
            auto_complete,
            spoken: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            submitted: Notify::new(),
        }
    }

    /// Every utterance that reached the platform, in submission order
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().clone()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken.lock().iter().map(|u| u.text.clone()).collect()
    }

    /// Wait for the latest submitted utterance and end it with `outcome`
    pub async fn finish_current(&self, outcome: SpeechOutcome) -> Uuid {
        loop {
            let notified = self.submitted.notified();
            let pending = self.pending.lock().take();
            if let Some((id, tx)) = pending {
                // A send error means the utterance was cancelled first; it already ended.
                let _ = tx.send(outcome);
                return id;
            }
            notified.await;
        }
    }
}

impl Default for ScriptedSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> SpeechOutcome {
        self.spoken.lock().push(utterance.clone());

        if self.auto_complete {
            return SpeechOutcome::Completed;
        }

        let (tx, rx) = oneshot::channel();
        *self.pending.lock() = Some((utterance.id, tx));
        self.submitted.notify_one();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => SpeechOutcome::Cancelled,
            outcome = rx => outcome.unwrap_or(SpeechOutcome::Cancelled),
        };

        let mut pending = self.pending.lock();
        if pending.as_ref().is_some_and(|(id, _)| *id == utterance.id) {
            pending.take();
        }
        outcome
    }
}

pub struct ScriptedRecognizer {
    available: bool,
    requests: Mutex<Vec<RecognitionRequest>>,
    pending: Mutex<Option<(Uuid, oneshot::Sender<RecognitionOutcome>)>>,
    opened: Notify,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::build(true)
    }

    pub fn unavailable() -> Self {
        Self::build(false)
    }

    fn build(available: bool) -> Self {
        Self {
            available,
            requests: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            opened: Notify::new(),
        }
    }

    /// Every request the platform received, in order
    pub fn requests(&self) -> Vec<RecognitionRequest> {
        self.requests.lock().clone()
    }

    pub fn session_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn has_open_session(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Wait for an open session and deliver its terminal event
    pub async fn respond(&self, outcome: RecognitionOutcome) {
        loop {
            let notified = self.opened.notified();
            let pending = self.pending.lock().take();
            if let Some((_, tx)) = pending {
                let _ = tx.send(outcome);
                return;
            }
            notified.await;
        }
    }

    /// Deliver a terminal event if a session is open right now
    pub fn try_respond(&self, outcome: RecognitionOutcome) -> bool {
        match self.pending.lock().take() {
            Some((_, tx)) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, request: &RecognitionRequest, cancel: CancellationToken) -> RecognitionOutcome {
        self.requests.lock().push(request.clone());
        if cancel.is_cancelled() {
            return RecognitionOutcome::Ended;
        }

        let (tx, rx) = oneshot::channel();
        *self.pending.lock() = Some((request.session_id, tx));
        self.opened.notify_one();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => RecognitionOutcome::Ended,
            outcome = rx => outcome.unwrap_or(RecognitionOutcome::Ended),
        };

        let mut pending = self.pending.lock();
        if pending.as_ref().is_some_and(|(id, _)| *id == request.session_id) {
            pending.take();
        }
        drop(pending);
        outcome
    }
}

/// Navigator that only remembers where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &Route) {
        self.routes.lock().push(route.clone());
    }
}
