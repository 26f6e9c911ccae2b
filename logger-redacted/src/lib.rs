//! Logging setup for the MediTech voice layer
//!
//! Voice commands are spoken by patients and health workers in public
//! settings, and recognised transcripts routinely contain identifiers:
//! mobile numbers read out for call-backs, Aadhaar numbers during
//! registration, the odd email address. Nothing that reaches a log line may
//! carry them in clear text.
//!
//! This crate provides two things:
//!
//! - [`init_tracing`]: installs the process-wide `tracing` subscriber, with a
//!   human-readable format for development and JSON for production.
//! - [`PiiRedactor`]: scrubs identifiers out of free text before it is logged.
//!
//! # Example
//!
//! ```rust
//! use logger_redacted::{init_tracing, LoggerConfig, PiiRedactor};
//!
//! let config = LoggerConfig::default().with_log_level("debug");
//! init_tracing(&config).ok();
//!
//! let redactor = PiiRedactor::new(config.redaction());
//! tracing::info!(
//!     transcript = %redactor.redact("my number is 98765 43210"),
//!     "Transcript received"
//! );
//! // transcript=my number is XXXXXX3210
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| LoggerError::InvalidFilter(e.to_string()))?;

    let installed = if config.json_output {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
            .map_err(|_| LoggerError::AlreadyInitialized)
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .try_init()
            .map_err(|_| LoggerError::AlreadyInitialized)
    };

    installed?;
    tracing::debug!(
        level = %config.log_level,
        json = config.json_output,
        redaction = config.redaction_enabled,
        "Tracing initialized"
    );
    Ok(())
}
