//! Voice command interpretation.
//!
//! Keyword sets are data: each locale bundle lists the phrases that mean
//! "home", "login" and "help", plus role phrases for the login target.
//! Matching is a plain substring test on the normalized transcript, with a
//! fixed priority order of Home, then Login, then Help.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::locale::{LocaleCatalog, LocaleCode};

/// Role used when a login command names no role
pub const DEFAULT_LOGIN_ROLE: &str = "patient";

/// Action derived from one recognised utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum CommandIntent {
    NavigateHome,
    NavigateLogin { role: String },
    RequestHelp,
    Unrecognized,
}

impl CommandIntent {
    pub fn is_navigation(&self) -> bool {
        matches!(self, CommandIntent::NavigateHome | CommandIntent::NavigateLogin { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleKeywords {
    pub id: String,
    pub keywords: Vec<String>,
}

/// Trigger phrases for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    #[serde(default)]
    pub home: Vec<String>,
    #[serde(default)]
    pub login: Vec<String>,
    #[serde(default)]
    pub help: Vec<String>,
    /// Tested in order; the first role with a matching phrase wins
    #[serde(default)]
    pub roles: Vec<RoleKeywords>,
    #[serde(default = "default_role")]
    pub default_role: String,
}

fn default_role() -> String {
    DEFAULT_LOGIN_ROLE.to_string()
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self {
            home: Vec::new(),
            login: Vec::new(),
            help: Vec::new(),
            roles: Vec::new(),
            default_role: default_role(),
        }
    }
}

impl KeywordSet {
    /// Lowercase and trim every phrase, dropping blanks (a blank phrase would match everything)
    pub fn normalized(self) -> Self {
        let default_role = match self.default_role.trim() {
            "" => default_role(),
            role => role.to_string(),
        };

        Self {
            home: normalize_phrases(self.home),
            login: normalize_phrases(self.login),
            help: normalize_phrases(self.help),
            roles: self
                .roles
                .into_iter()
                .map(|role| RoleKeywords {
                    id: role.id,
                    keywords: normalize_phrases(role.keywords),
                })
                .collect(),
            default_role,
        }
    }

    /// Add phrases from `other`; roles with the same id are merged
    pub fn merge(&mut self, other: KeywordSet) {
        let other = other.normalized();
        self.home.extend(other.home);
        self.login.extend(other.login);
        self.help.extend(other.help);

        for role in other.roles {
            match self.roles.iter_mut().find(|existing| existing.id == role.id) {
                Some(existing) => existing.keywords.extend(role.keywords),
                None => self.roles.push(role),
            }
        }
    }

    fn resolve_role(&self, text: &str) -> String {
        self.roles
            .iter()
            .find(|role| contains_any(text, &role.keywords))
            .map(|role| role.id.clone())
            .unwrap_or_else(|| self.default_role.clone())
    }
}

fn normalize_phrases(phrases: Vec<String>) -> Vec<String> {
    phrases
        .into_iter()
        .map(|phrase| phrase.trim().to_lowercase())
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

fn contains_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| text.contains(phrase.as_str()))
}

/// Maps transcripts to intents using per-locale keyword sets
#[derive(Debug, Clone, Default)]
pub struct CommandInterpreter {
    keywords: HashMap<LocaleCode, KeywordSet>,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: &LocaleCatalog) -> Self {
        let mut interpreter = Self::new();
        for (locale, set) in catalog.keyword_sets() {
            interpreter.extend(locale, set.clone());
        }
        interpreter
    }

    pub fn with_keywords(mut self, locale: LocaleCode, set: KeywordSet) -> Self {
        self.extend(locale, set);
        self
    }

    /// Register more phrases for a locale without touching the matching rules
    pub fn extend(&mut self, locale: LocaleCode, set: KeywordSet) {
        match self.keywords.get_mut(&locale) {
            Some(existing) => existing.merge(set),
            None => {
                self.keywords.insert(locale, set.normalized());
            }
        }
    }

    pub fn keyword_set(&self, locale: LocaleCode) -> Option<&KeywordSet> {
        self.keywords.get(&locale)
    }

    pub fn interpret(&self, transcript: &str, locale: LocaleCode) -> CommandIntent {
        let text = transcript.trim().to_lowercase();
        if text.is_empty() {
            return CommandIntent::Unrecognized;
        }

        let Some(set) = self
            .keywords
            .get(&locale)
            .or_else(|| self.keywords.get(&LocaleCode::En))
        else {
            return CommandIntent::Unrecognized;
        };

        if contains_any(&text, &set.home) {
            CommandIntent::NavigateHome
        } else if contains_any(&text, &set.login) {
            CommandIntent::NavigateLogin {
                role: set.resolve_role(&text),
            }
        } else if contains_any(&text, &set.help) {
            CommandIntent::RequestHelp
        } else {
            CommandIntent::Unrecognized
        }
    }
}
