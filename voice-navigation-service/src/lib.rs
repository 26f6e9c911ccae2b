//! Voice Navigation Service for the MediTech rural healthcare portal
//!
//! Coordinates speech-to-text command capture, text-to-speech feedback and
//! locale-aware behaviour so that users with low literacy can move around
//! the portal by voice.
//!
//! # Components
//!
//! - [`LocaleStore`](locale::LocaleStore) - active locale, persistence and translation
//! - [`SpeechOutputEngine`](output::SpeechOutputEngine) - at most one utterance in flight
//! - [`SpeechInputEngine`](input::SpeechInputEngine) - at most one single-shot recognition session
//! - [`CommandInterpreter`](interpreter::CommandInterpreter) - transcript to navigation intent
//! - [`VoiceSessionController`](controller::VoiceSessionController) - the session state machine
//!
//! Platform speech support is plugged in through the
//! [`SpeechSynthesizer`](providers::SpeechSynthesizer) and
//! [`SpeechRecognizer`](providers::SpeechRecognizer) traits.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voice_navigation_service::locale::{LocaleCatalog, LocaleStore, MemoryPreferenceStore};
//! use voice_navigation_service::providers::console::{ConsoleSynthesizer, LoggingNavigator};
//! use voice_navigation_service::providers::scripted::ScriptedRecognizer;
//! use voice_navigation_service::{VoiceConfig, VoiceParts, VoiceSessionController};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let locale = Arc::new(LocaleStore::open(
//!     Arc::new(MemoryPreferenceStore::new()),
//!     Arc::new(LocaleCatalog::builtin()?),
//! ));
//! let parts = VoiceParts::new(
//!     locale,
//!     Arc::new(ConsoleSynthesizer::new()),
//!     Arc::new(ScriptedRecognizer::new()),
//!     Arc::new(LoggingNavigator::new()),
//! );
//! let voice = VoiceSessionController::init(parts, VoiceConfig::from_env()?);
//!
//! voice.toggle_voice();
//! voice.start_listening();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod input;
pub mod interpreter;
pub mod locale;
pub mod navigation;
pub mod output;
pub mod providers;
pub mod registry;
pub mod speech;

pub use config::VoiceConfig;
pub use controller::{VoiceParts, VoiceSessionController, VoiceSessionState};
pub use error::{SessionError, VoiceError, VoiceResult};
pub use events::VoiceEvent;
pub use interpreter::{CommandIntent, CommandInterpreter, KeywordSet};
pub use locale::{LocaleCode, LocaleStore};
pub use navigation::{Navigator, Route};
