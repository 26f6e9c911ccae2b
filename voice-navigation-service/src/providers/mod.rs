pub mod console;
pub mod scripted;
pub mod unavailable;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::speech::{RecognitionOutcome, RecognitionRequest, SpeechOutcome, Utterance};

/// Platform text-to-speech capability
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether the platform can synthesize speech at all
    fn is_available(&self) -> bool;

    /// Play one utterance, resolving when playback ends.
    ///
    /// Implementations must stop playback and return
    /// [`SpeechOutcome::Cancelled`] promptly once `cancel` fires.
    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> SpeechOutcome;
}

/// Platform speech-to-text capability
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the platform can recognize speech at all
    fn is_available(&self) -> bool;

    /// Run one single-shot recognition, resolving with its terminal event.
    ///
    /// When `cancel` fires the implementation should stop capturing and
    /// return whatever it has, or [`RecognitionOutcome::Ended`].
    async fn recognize(&self, request: &RecognitionRequest, cancel: CancellationToken) -> RecognitionOutcome;
}
