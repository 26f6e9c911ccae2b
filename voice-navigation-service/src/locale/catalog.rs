use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::LocaleCode;
use crate::error::{VoiceError, VoiceResult};
use crate::interpreter::KeywordSet;

/// Localized UI strings for one locale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable(HashMap<String, String>);

impl TranslationTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self(entries)
    }

    /// Empty values count as missing
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Missing keys come back verbatim
    pub fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or(key).to_string()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// On-disk shape of `resources/locales/<code>.json`
#[derive(Debug, Deserialize)]
struct LocaleBundle {
    #[serde(default)]
    translations: TranslationTable,
    #[serde(default)]
    commands: KeywordSet,
}

const BUILTIN_BUNDLES: [(LocaleCode, &str); 5] = [
    (LocaleCode::En, include_str!("../../resources/locales/en.json")),
    (LocaleCode::Hi, include_str!("../../resources/locales/hi.json")),
    (LocaleCode::Ta, include_str!("../../resources/locales/ta.json")),
    (LocaleCode::Ml, include_str!("../../resources/locales/ml.json")),
    (LocaleCode::Pa, include_str!("../../resources/locales/pa.json")),
];

/// Translation tables and command keyword sets for every supported locale
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    tables: HashMap<LocaleCode, TranslationTable>,
    keywords: HashMap<LocaleCode, KeywordSet>,
}

impl LocaleCatalog {
    /// Catalog built from the bundles shipped with the crate
    pub fn builtin() -> VoiceResult<Self> {
        Self::from_bundles(BUILTIN_BUNDLES)
    }

    pub fn from_bundles<'a, I>(bundles: I) -> VoiceResult<Self>
    where
        I: IntoIterator<Item = (LocaleCode, &'a str)>,
    {
        let mut catalog = Self::default();
        for (locale, raw) in bundles {
            let bundle: LocaleBundle = serde_json::from_str(raw)
                .map_err(|e| VoiceError::Catalog(format!("{} bundle: {}", locale, e)))?;
            catalog.tables.insert(locale, bundle.translations);
            catalog.keywords.insert(locale, bundle.commands);
        }
        Ok(catalog)
    }

    pub fn with_table(mut self, locale: LocaleCode, table: TranslationTable) -> Self {
        self.tables.insert(locale, table);
        self
    }

    pub fn table(&self, locale: LocaleCode) -> Option<&TranslationTable> {
        self.tables.get(&locale)
    }

    pub fn translate(&self, locale: LocaleCode, key: &str) -> String {
        match self.table(locale) {
            Some(table) => table.translate(key),
            None => key.to_string(),
        }
    }

    pub fn keyword_set(&self, locale: LocaleCode) -> Option<&KeywordSet> {
        self.keywords.get(&locale)
    }

    pub fn keyword_sets(&self) -> impl Iterator<Item = (LocaleCode, &KeywordSet)> {
        self.keywords.iter().map(|(locale, set)| (*locale, set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_covers_every_locale() {
        let catalog = LocaleCatalog::builtin().unwrap();

        for locale in LocaleCode::ALL {
            let table = catalog.table(locale).unwrap();
            assert!(!table.is_empty(), "{} has no translations", locale);
            assert!(catalog.keyword_set(locale).is_some(), "{} has no keywords", locale);
        }
    }

    #[test]
    fn test_builtin_voice_prompts_are_translated() {
        let catalog = LocaleCatalog::builtin().unwrap();
        let english = catalog.table(LocaleCode::En).unwrap();

        for locale in [LocaleCode::Hi, LocaleCode::Ta, LocaleCode::Ml, LocaleCode::Pa] {
            for key in ["listening", "speakToNavigate", "didNotUnderstand", "voiceNavigation"] {
                assert_ne!(
                    catalog.translate(locale, key),
                    english.translate(key),
                    "{} falls back to English for {}",
                    locale,
                    key
                );
            }
        }
    }

    #[test]
    fn test_missing_key_returns_key() {
        let catalog = LocaleCatalog::builtin().unwrap();
        assert_eq!(catalog.translate(LocaleCode::Hi, "nonexistent_key"), "nonexistent_key");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let table = TranslationTable::new(HashMap::from([
            ("blank".to_string(), String::new()),
            ("login".to_string(), "Login".to_string()),
        ]));

        assert_eq!(table.translate("blank"), "blank");
        assert_eq!(table.translate("login"), "Login");
    }

    #[test]
    fn test_malformed_bundle_is_catalog_error() {
        let result = LocaleCatalog::from_bundles([(LocaleCode::En, "{ not json")]);
        assert!(matches!(result, Err(VoiceError::Catalog(_))));
    }

    #[test]
    fn test_locale_without_table_translates_to_key() {
        let catalog = LocaleCatalog::default();
        assert_eq!(catalog.translate(LocaleCode::Ta, "welcome"), "welcome");
    }
}
