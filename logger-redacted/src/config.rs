// Logger configuration
use serde::{Deserialize, Serialize};

use crate::redactor::RedactionConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    pub redaction_enabled: bool,
    pub hash_for_correlation: bool,
    pub json_output: bool,
    pub log_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            hash_for_correlation: false,
            json_output: false,
            log_level: "info".to_string(),
        }
    }
}

impl LoggerConfig {
    /// Load logger settings from `VOICE_LOG_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            redaction_enabled: env_flag("VOICE_LOG_REDACTION").unwrap_or(defaults.redaction_enabled),
            hash_for_correlation: env_flag("VOICE_LOG_HASH_PII").unwrap_or(defaults.hash_for_correlation),
            json_output: env_flag("VOICE_LOG_JSON").unwrap_or(defaults.json_output),
            log_level: std::env::var("VOICE_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn redaction(&self) -> RedactionConfig {
        RedactionConfig {
            enabled: self.redaction_enabled,
            hash_for_correlation: self.hash_for_correlation,
            ..Default::default()
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
