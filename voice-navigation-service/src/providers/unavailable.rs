use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{SpeechRecognizer, SpeechSynthesizer};
use crate::error::SessionError;
use crate::speech::{RecognitionOutcome, RecognitionRequest, SpeechOutcome, Utterance};

/// Stand-in for devices without speech synthesis or recognition
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeechSupport;

#[async_trait]
impl SpeechSynthesizer for NoSpeechSupport {
    fn is_available(&self) -> bool {
        false
    }

    async fn speak(&self, _utterance: &Utterance, _cancel: CancellationToken) -> SpeechOutcome {
        SpeechOutcome::Failed("speech synthesis not supported".to_string())
    }
}

#[async_trait]
impl SpeechRecognizer for NoSpeechSupport {
    fn is_available(&self) -> bool {
        false
    }

    async fn recognize(&self, _request: &RecognitionRequest, _cancel: CancellationToken) -> RecognitionOutcome {
        RecognitionOutcome::Failed(SessionError::Platform("speech recognition not supported".to_string()))
    }
}
