use serde::Serialize;
use uuid::Uuid;

use crate::controller::VoiceSessionState;
use crate::error::SessionError;
use crate::interpreter::CommandIntent;
use crate::locale::LocaleCode;
use crate::navigation::Route;
use crate::speech::{RecognitionSession, SpeechOutcome};

/// Capacity of the broadcast channel; slow subscribers skip older events
pub const EVENT_BUFFER: usize = 64;

/// Notifications published for UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VoiceEvent {
    StateChanged {
        state: VoiceSessionState,
    },
    ListeningStarted {
        session: RecognitionSession,
    },
    TranscriptRecognized {
        session_id: Uuid,
        transcript: String,
        intent: CommandIntent,
    },
    Navigated {
        route: Route,
    },
    SessionFailed {
        session_id: Uuid,
        reason: SessionError,
    },
    UtteranceStarted {
        utterance_id: Uuid,
        text: String,
        locale: LocaleCode,
    },
    UtteranceFinished {
        utterance_id: Uuid,
        outcome: SpeechOutcome,
    },
    LocaleChanged {
        locale: LocaleCode,
    },
}
