//! Translator configuration

use crate::preferences::parse_accept_language;
use lexis_cache::CacheConfig;
use lexis_core::DEFAULT_FALLBACK_LANGUAGE;

/// Settings for a [`Translator`](crate::Translator) session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorConfig {
    /// Language tags in order of preference
    pub preferences: Vec<String>,
    /// Tried after every preference
    pub fallback: String,
    /// Persistent caching; `None` keeps resolved translations in memory only
    pub cache: Option<CacheConfig>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            preferences: Vec::new(),
            fallback: DEFAULT_FALLBACK_LANGUAGE.to_string(),
            cache: None,
        }
    }
}

impl TranslatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    /// Preferences taken from an HTTP `Accept-Language` header
    #[must_use]
    pub fn with_accept_language(mut self, header: &str) -> Self {
        self.preferences = parse_accept_language(header);
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }
}
