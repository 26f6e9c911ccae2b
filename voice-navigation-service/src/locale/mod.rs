//! Locale selection, translation tables and durable preferences.

pub mod catalog;
pub mod preferences;
pub mod store;

pub use catalog::*;
pub use preferences::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages supported by the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    #[default]
    En,
    Hi,
    Ta,
    Ml,
    Pa,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl LocaleCode {
    pub const ALL: [LocaleCode; 5] = [
        LocaleCode::En,
        LocaleCode::Hi,
        LocaleCode::Ta,
        LocaleCode::Ml,
        LocaleCode::Pa,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LocaleCode::En => "en",
            LocaleCode::Hi => "hi",
            LocaleCode::Ta => "ta",
            LocaleCode::Ml => "ml",
            LocaleCode::Pa => "pa",
        }
    }

    /// Region-qualified tag handed to speech engines
    pub fn speech_tag(self) -> &'static str {
        match self {
            LocaleCode::En => "en-US",
            LocaleCode::Hi => "hi-IN",
            LocaleCode::Ta => "ta-IN",
            LocaleCode::Ml => "ml-IN",
            LocaleCode::Pa => "pa-IN",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            LocaleCode::En => "English",
            LocaleCode::Hi => "Hindi",
            LocaleCode::Ta => "Tamil",
            LocaleCode::Ml => "Malayalam",
            LocaleCode::Pa => "Punjabi",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            LocaleCode::En => "English",
            LocaleCode::Hi => "हिन्दी",
            LocaleCode::Ta => "தமிழ்",
            LocaleCode::Ml => "മലയാളം",
            LocaleCode::Pa => "ਪੰਜਾਬੀ",
        }
    }

    /// Strict lookup against the closed set (case-insensitive, surrounding whitespace ignored)
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }

    /// Lenient lookup: anything outside the closed set resolves to English
    pub fn resolve(code: &str) -> Self {
        Self::parse(code).unwrap_or_default()
    }
}

impl FromStr for LocaleCode {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_locale_has_region_tag() {
        for locale in LocaleCode::ALL {
            let tag = locale.speech_tag();
            assert!(tag.starts_with(locale.code()));
            assert!(tag.contains('-'));
        }
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(LocaleCode::parse("hi"), Some(LocaleCode::Hi));
        assert_eq!(LocaleCode::parse(" PA "), Some(LocaleCode::Pa));
        assert_eq!(LocaleCode::parse("fr"), None);
        assert_eq!(LocaleCode::parse(""), None);
        assert!("xx".parse::<LocaleCode>().is_err());
    }

    #[test]
    fn test_unknown_codes_resolve_to_english() {
        assert_eq!(LocaleCode::resolve("de"), LocaleCode::En);
        assert_eq!(LocaleCode::resolve("ta"), LocaleCode::Ta);
        assert_eq!(LocaleCode::resolve("fr").speech_tag(), "en-US");
    }

    #[test]
    fn test_serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&LocaleCode::Ml).unwrap();
        assert_eq!(json, "\"ml\"");
        let parsed: LocaleCode = serde_json::from_str("\"pa\"").unwrap();
        assert_eq!(parsed, LocaleCode::Pa);
    }
}
