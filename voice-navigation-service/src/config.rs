use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::error::{VoiceError, VoiceResult};

/// Voice navigation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoiceConfig {
    /// Start with voice enabled instead of Disabled
    pub voice_enabled: bool,
    /// Speak the localized "listening" prompt when a session opens
    pub announce_listening: bool,
    /// Cancel a recognition session with no terminal event after this long; 0 disables
    pub recognition_timeout_ms: u64,
    /// Durable preference file holding the selected locale
    pub preferences_path: PathBuf,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            voice_enabled: false,
            announce_listening: true,
            recognition_timeout_ms: 10_000,
            preferences_path: PathBuf::from("meditech-preferences.json"),
        }
    }
}

impl VoiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> VoiceResult<Self> {
        let defaults = Self::default();

        let voice_enabled = parse_env("VOICE_ENABLED")?.unwrap_or(defaults.voice_enabled);

        let announce_listening =
            parse_env("VOICE_ANNOUNCE_LISTENING")?.unwrap_or(defaults.announce_listening);

        let recognition_timeout_ms =
            parse_env("VOICE_RECOGNITION_TIMEOUT_MS")?.unwrap_or(defaults.recognition_timeout_ms);

        let preferences_path = std::env::var("VOICE_PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.preferences_path);

        Ok(Self {
            voice_enabled,
            announce_listening,
            recognition_timeout_ms,
            preferences_path,
        })
    }

    pub fn recognition_timeout(&self) -> Option<Duration> {
        (self.recognition_timeout_ms > 0).then(|| Duration::from_millis(self.recognition_timeout_ms))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> VoiceResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| VoiceError::Config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VoiceConfig::default();
        assert!(!config.voice_enabled);
        assert!(config.announce_listening);
        assert_eq!(config.recognition_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = VoiceConfig {
            recognition_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.recognition_timeout(), None);
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        std::env::set_var("VOICE_TEST_BOGUS_FLAG", "sometimes");
        let parsed: VoiceResult<Option<bool>> = parse_env("VOICE_TEST_BOGUS_FLAG");
        assert!(matches!(parsed, Err(VoiceError::Config(_))));
        std::env::remove_var("VOICE_TEST_BOGUS_FLAG");
    }
}
