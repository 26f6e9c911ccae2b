use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{LocaleCatalog, LocaleCode, PreferenceStore, LOCALE_KEY};

/// Holds the active locale, persists every change and translates UI keys.
///
/// The locale is the only state shared across voice sessions. Engines read it
/// lazily when a session or utterance starts, so a change is never applied
/// retroactively to work already in flight.
pub struct LocaleStore {
    preferences: Arc<dyn PreferenceStore>,
    catalog: Arc<LocaleCatalog>,
    current: watch::Sender<LocaleCode>,
}

impl LocaleStore {
    /// Restore the persisted locale, defaulting to English when absent or unreadable
    pub fn open(preferences: Arc<dyn PreferenceStore>, catalog: Arc<LocaleCatalog>) -> Self {
        let initial = match preferences.get(LOCALE_KEY) {
            Ok(Some(code)) => LocaleCode::parse(&code).unwrap_or_else(|| {
                warn!(persisted = %code, "Ignoring unsupported persisted locale");
                LocaleCode::default()
            }),
            Ok(None) => LocaleCode::default(),
            Err(e) => {
                warn!(error = %e, "Could not read persisted locale, using default");
                LocaleCode::default()
            }
        };

        debug!(locale = %initial, "Locale store opened");
        let (current, _) = watch::channel(initial);

        Self {
            preferences,
            catalog,
            current,
        }
    }

    pub fn get_locale(&self) -> LocaleCode {
        *self.current.borrow()
    }

    /// Switch locale by code. Codes outside the supported set are ignored and
    /// the previous locale stays active; the return value says whether the
    /// change was accepted.
    pub fn set_locale(&self, code: &str) -> bool {
        match LocaleCode::parse(code) {
            Some(locale) => {
                self.set_locale_code(locale);
                true
            }
            None => {
                debug!(code, "Rejected unsupported locale");
                false
            }
        }
    }

    pub fn set_locale_code(&self, locale: LocaleCode) {
        if let Err(e) = self.preferences.set(LOCALE_KEY, locale.code()) {
            warn!(locale = %locale, error = %e, "Failed to persist locale, keeping it for this run only");
        }

        let previous = self.current.send_replace(locale);
        if previous != locale {
            info!(from = %previous, to = %locale, "Locale changed");
        }
    }

    pub fn translate(&self, key: &str) -> String {
        self.catalog.translate(self.get_locale(), key)
    }

    pub fn translate_for(&self, locale: LocaleCode, key: &str) -> String {
        self.catalog.translate(locale, key)
    }

    pub fn subscribe(&self) -> watch::Receiver<LocaleCode> {
        self.current.subscribe()
    }

    pub fn catalog(&self) -> &LocaleCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{VoiceError, VoiceResult};
    use crate::locale::{FilePreferenceStore, MemoryPreferenceStore};

    struct BrokenPreferences;

    impl PreferenceStore for BrokenPreferences {
        fn get(&self, _key: &str) -> VoiceResult<Option<String>> {
            Err(VoiceError::Storage("disk unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> VoiceResult<()> {
            Err(VoiceError::Storage("disk unavailable".to_string()))
        }
    }

    fn catalog() -> Arc<LocaleCatalog> {
        Arc::new(LocaleCatalog::builtin().unwrap())
    }

    #[test]
    fn test_defaults_to_english_on_first_run() {
        let store = LocaleStore::open(Arc::new(MemoryPreferenceStore::new()), catalog());
        assert_eq!(store.get_locale(), LocaleCode::En);
    }

    #[test]
    fn test_restores_persisted_locale() {
        let prefs = MemoryPreferenceStore::new().with_entry(LOCALE_KEY, "ta");
        let store = LocaleStore::open(Arc::new(prefs), catalog());
        assert_eq!(store.get_locale(), LocaleCode::Ta);
    }

    #[test]
    fn test_unsupported_persisted_value_falls_back() {
        let prefs = MemoryPreferenceStore::new().with_entry(LOCALE_KEY, "klingon");
        let store = LocaleStore::open(Arc::new(prefs), catalog());
        assert_eq!(store.get_locale(), LocaleCode::En);
    }

    #[test]
    fn test_invalid_code_keeps_previous_locale() {
        let store = LocaleStore::open(Arc::new(MemoryPreferenceStore::new()), catalog());
        assert!(store.set_locale("hi"));
        assert!(!store.set_locale("fr"));
        assert_eq!(store.get_locale(), LocaleCode::Hi);
    }

    #[test]
    fn test_locale_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = LocaleStore::open(Arc::new(FilePreferenceStore::new(&path)), catalog());
        assert!(store.set_locale("ml"));
        drop(store);

        let restarted = LocaleStore::open(Arc::new(FilePreferenceStore::new(&path)), catalog());
        assert_eq!(restarted.get_locale(), LocaleCode::Ml);
    }

    #[test]
    fn test_persistence_failure_still_switches_locale() {
        let store = LocaleStore::open(Arc::new(BrokenPreferences), catalog());
        assert_eq!(store.get_locale(), LocaleCode::En);

        assert!(store.set_locale("pa"));
        assert_eq!(store.get_locale(), LocaleCode::Pa);
    }

    #[test]
    fn test_translate_uses_active_locale() {
        let store = LocaleStore::open(Arc::new(MemoryPreferenceStore::new()), catalog());
        assert_eq!(store.translate("login"), "Login");

        store.set_locale("hi");
        assert_eq!(store.translate("login"), "लॉगिन");
        assert_eq!(store.translate("nonexistent_key"), "nonexistent_key");
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = LocaleStore::open(Arc::new(MemoryPreferenceStore::new()), catalog());
        let mut rx = store.subscribe();

        store.set_locale("ta");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), LocaleCode::Ta);
    }
}
