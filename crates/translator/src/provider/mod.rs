//! Sources of raw translations

mod config_file;

pub use config_file::{ConfigFileConverter, ConfigFileProvider, JsonConverter, YamlConverter};

use lexis_core::{Language, Translation};
use std::collections::HashMap;

/// Priority given to providers added without one
pub const DEFAULT_PRIORITY: i32 = 100;

/// Looks up raw translations for a language.
///
/// Answers are all-or-nothing: one translation per requested key, in key
/// order, or an empty vector meaning "try the next provider or language".
/// Returned translations carry no language; the translator binds the
/// preference they answered.
pub trait Provider: Send + Sync {
    fn translations(&self, language: &Language, keys: &[String]) -> Vec<Translation>;
}

/// Translations held in memory, keyed by language and message key
#[derive(Debug, Clone, Default)]
pub struct ArrayProvider {
    data: HashMap<Language, HashMap<String, String>>,
}

impl ArrayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite entries for `language`
    pub fn set<I, K, V>(&mut self, language: &Language, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.data.entry(language.clone()).or_default();
        for (key, text) in entries {
            table.insert(key.into(), text.into());
        }
    }

    /// Builder form of [`ArrayProvider::set`]
    #[must_use]
    pub fn with<I, K, V>(mut self, language: &Language, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.set(language, entries);
        self
    }

    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.data.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.data.values().all(HashMap::is_empty)
    }
}

impl Provider for ArrayProvider {
    fn translations(&self, language: &Language, keys: &[String]) -> Vec<Translation> {
        let Some(table) = self.data.get(language) else {
            return Vec::new();
        };

        keys.iter()
            .map(|key| {
                table
                    .get(key)
                    .map(|text| Translation::new(text.as_str()).detect_processors())
            })
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default()
    }
}

struct Entry {
    priority: i32,
    provider: Box<dyn Provider>,
}

/// Providers in consultation order: lowest priority value first, ties in
/// the order they were added
#[derive(Default)]
pub struct ProviderChain {
    entries: Vec<Entry>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, provider: impl Provider + 'static, priority: i32) {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.priority > priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            position,
            Entry {
                priority,
                provider: Box::new(provider),
            },
        );
    }

    /// The first non-empty answer for `language`
    pub fn translations(&self, language: &Language, keys: &[String]) -> Vec<Translation> {
        for entry in &self.entries {
            let found = entry.provider.translations(language, keys);
            if found.is_empty() {
                continue;
            }
            if found.len() == keys.len() {
                return found;
            }
            tracing::warn!(
                language = %language,
                expected = keys.len(),
                returned = found.len(),
                "Ignoring partial answer from translation provider"
            );
        }
        Vec::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.priority))
            .finish()
    }
}
