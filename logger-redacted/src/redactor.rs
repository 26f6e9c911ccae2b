use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    // Aadhaar numbers never start with 0 or 1; spoken digits often arrive grouped 4-4-4.
    static ref AADHAAR_REGEX: Regex = Regex::new(r"\b[2-9]\d{3}[\s-]?\d{4}[\s-]?\d{4}\b").unwrap();
    static ref MOBILE_REGEX: Regex =
        Regex::new(r"(?:\+91[\s-]?|\b0[\s-]?|\b)[6-9]\d{4}[\s-]?\d{5}\b").unwrap();
}

/// Which identifiers to scrub from recognised speech before it is logged
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_aadhaar: bool,
    pub redact_mobile_numbers: bool,
    /// Replace matches with a short hash so repeated values can be correlated
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_aadhaar: true,
            redact_mobile_numbers: true,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn with_custom_pattern(mut self, pattern: Regex, replacement: impl Into<String>) -> Self {
        self.custom_patterns.push((pattern, replacement.into()));
        self
    }
}

/// Scrubs personal identifiers out of transcripts and other free text
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // Aadhaar first: its 12 digits would otherwise be half-eaten by the mobile pattern.
        if self.config.redact_aadhaar {
            result = self.redact_aadhaar(&result);
        }

        if self.config.redact_mobile_numbers {
            result = self.redact_mobile_numbers(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_aadhaar(&self, text: &str) -> String {
        AADHAAR_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let number = &caps[0];
                if self.config.hash_for_correlation {
                    format!("AADHAAR[{}]", self.hash_value(&digits_only(number)))
                } else {
                    format!("XXXX XXXX {}", last_digits(number, 4))
                }
            })
            .to_string()
    }

    fn redact_mobile_numbers(&self, text: &str) -> String {
        MOBILE_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let number = &caps[0];
                if self.config.hash_for_correlation {
                    format!("MOBILE[{}]", self.hash_value(&last_digits(number, 10)))
                } else {
                    format!("XXXXXX{}", last_digits(number, 4))
                }
            })
            .to_string()
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    return format!("EMAIL[{}]", self.hash_value(email));
                }
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            })
            .to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        general_purpose::STANDARD_NO_PAD.encode(&digest[..8])
    }
}

fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

fn last_digits(text: &str, count: usize) -> String {
    let digits = digits_only(text);
    let skip = digits.len().saturating_sub(count);
    digits.chars().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aadhaar_masking_keeps_last_four() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("my aadhaar is 2345 6789 0123");
        assert_eq!(redacted, "my aadhaar is XXXX XXXX 0123");
    }

    #[test]
    fn test_mobile_number_masking() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("call +91 98765 43210 please");
        assert_eq!(redacted, "call XXXXXX3210 please");

        let redacted = redactor.redact("number 9876543210");
        assert_eq!(redacted, "number XXXXXX3210");

        let redacted = redactor.redact("call 09876543210");
        assert_eq!(redacted, "call XXXXXX3210");

        let redacted = redactor.redact("trunk 0 98765-43210 ok");
        assert_eq!(redacted, "trunk XXXXXX3210 ok");
    }

    #[test]
    fn test_email_masking() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("mail asha.worker@example.org");
        assert!(redacted.contains("a***@e***"));
        assert!(!redacted.contains("asha.worker"));
    }

    #[test]
    fn test_hash_for_correlation_is_stable() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });

        let first = redactor.redact("2345 6789 0123");
        let second = redactor.redact("234567890123");
        assert!(first.starts_with("AADHAAR["));
        assert_eq!(first, second);
    }

    #[test]
    fn test_mobile_hash_ignores_dialling_prefix() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });

        let bare = redactor.redact("9876543210");
        assert!(bare.starts_with("MOBILE["));
        assert_eq!(redactor.redact("+91 98765 43210"), bare);
        assert_eq!(redactor.redact("09876543210"), bare);
    }

    #[test]
    fn test_plain_commands_pass_through() {
        let redactor = PiiRedactor::default();

        assert_eq!(redactor.redact("go home"), "go home");
        assert_eq!(redactor.redact("मुझे होम पेज चाहिए"), "मुझे होम पेज चाहिए");
    }

    #[test]
    fn test_disabled_redactor_is_identity() {
        let redactor = PiiRedactor::new(RedactionConfig::disabled());

        assert_eq!(redactor.redact("9876543210"), "9876543210");
    }

    #[test]
    fn test_custom_pattern() {
        let config = RedactionConfig::default()
            .with_custom_pattern(Regex::new(r"\bMRN\d+").unwrap(), "MRN[REDACTED]");
        let redactor = PiiRedactor::new(config);

        assert_eq!(redactor.redact("open MRN123456"), "open MRN[REDACTED]");
    }
}
