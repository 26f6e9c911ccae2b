use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::locale::LocaleCode;

/// Speaking rate used for every utterance; slightly slow for low-literacy listeners
pub const SPEECH_RATE: f32 = 0.9;
pub const SPEECH_PITCH: f32 = 1.0;

/// One text-to-speech playback request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub id: Uuid,
    pub text: String,
    pub locale: LocaleCode,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, locale: LocaleCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            locale,
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
        }
    }

    pub fn speech_tag(&self) -> &'static str {
        self.locale.speech_tag()
    }
}

/// How an utterance ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SpeechOutcome {
    Completed,
    Cancelled,
    Failed(String),
}

/// One single-shot speech-to-text attempt, bound to the locale active when it opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionSession {
    pub id: Uuid,
    pub locale: LocaleCode,
    pub started_at: DateTime<Utc>,
}

impl RecognitionSession {
    pub fn new(locale: LocaleCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            locale,
            started_at: Utc::now(),
        }
    }
}

/// What the platform recognizer is asked to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub session_id: Uuid,
    pub lang: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl RecognitionRequest {
    pub fn single_shot(session: &RecognitionSession) -> Self {
        Self {
            session_id: session.id,
            lang: session.locale.speech_tag().to_string(),
            continuous: false,
            interim_results: false,
        }
    }
}

/// Raw terminal event reported by a platform recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    Transcript(String),
    /// The platform stopped without delivering a result
    Ended,
    Failed(SessionError),
}

/// Terminal result of a session after the input engine has normalized it
pub type RecognitionResult = Result<String, SessionError>;

impl RecognitionOutcome {
    /// Collapse a platform outcome into a session result; an empty or missing
    /// transcript is a no-result error, or a cancellation when one was requested
    pub fn into_result(self, cancel_requested: bool) -> RecognitionResult {
        let no_result = if cancel_requested {
            SessionError::Cancelled
        } else {
            SessionError::NoResult
        };

        match self {
            RecognitionOutcome::Transcript(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Err(no_result)
                } else {
                    Ok(text.to_string())
                }
            }
            RecognitionOutcome::Ended => Err(no_result),
            RecognitionOutcome::Failed(reason) => Err(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utterance_uses_fixed_prosody() {
        let utterance = Utterance::new("नमस्ते", LocaleCode::Hi);
        assert_eq!(utterance.rate, 0.9);
        assert_eq!(utterance.pitch, 1.0);
        assert_eq!(utterance.speech_tag(), "hi-IN");
    }

    #[test]
    fn test_request_is_single_shot() {
        let session = RecognitionSession::new(LocaleCode::Ta);
        let request = RecognitionRequest::single_shot(&session);
        assert!(!request.continuous);
        assert!(!request.interim_results);
        assert_eq!(request.lang, "ta-IN");
    }

    #[test]
    fn test_outcome_normalization() {
        assert_eq!(
            RecognitionOutcome::Transcript("  go home ".to_string()).into_result(false),
            Ok("go home".to_string())
        );
        assert_eq!(
            RecognitionOutcome::Transcript("   ".to_string()).into_result(false),
            Err(SessionError::NoResult)
        );
        assert_eq!(RecognitionOutcome::Ended.into_result(false), Err(SessionError::NoResult));
        assert_eq!(RecognitionOutcome::Ended.into_result(true), Err(SessionError::Cancelled));
        assert_eq!(
            RecognitionOutcome::Transcript("partial".to_string()).into_result(true),
            Ok("partial".to_string())
        );
        assert_eq!(
            RecognitionOutcome::Failed(SessionError::PermissionDenied).into_result(true),
            Err(SessionError::PermissionDenied)
        );
    }
}
