use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),

    #[error("A recognition session is already active")]
    SessionActive,

    #[error("A voice session controller is already installed")]
    AlreadyInitialized,

    #[error("No async runtime available to drive speech work")]
    NoRuntime,

    #[error("Preference storage error: {0}")]
    Storage(String),

    #[error("Locale catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

/// Why a recognition session ended without a transcript.
///
/// These never escape the input engine as faults; they arrive as the
/// terminal result of a session and the controller returns to idle.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionError {
    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no microphone available")]
    NoMicrophone,

    #[error("recognition timed out")]
    Timeout,

    #[error("session ended without a result")]
    NoResult,

    #[error("session cancelled")]
    Cancelled,

    #[error("network unavailable for recognition")]
    Network,

    #[error("platform failure: {0}")]
    Platform(String),
}
