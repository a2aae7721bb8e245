//! Translation resolution over providers, preferences and the cache

use crate::config::TranslatorConfig;
use crate::preferences::expand_preferences;
use crate::processor::{Context, Processor, ProcessorRegistry};
use crate::provider::{Provider, ProviderChain, DEFAULT_PRIORITY};
use crate::section::{SectionItem, SectionKey, TranslationSection};
use crate::undefined::UndefinedStrings;
use lexis_cache::{
    CacheConfig, CacheEngine, CacheSession, FileStore, LoadReport, RequestCache, SaveOutcome,
    TranslationMap,
};
use lexis_core::{Language, ProcessorId, Result, Translation};

enum CacheBackend {
    /// No persistent cache attached; resolved translations live for this session only
    Local(RequestCache),
    Session(Box<CacheSession<FileStore>>),
}

impl CacheBackend {
    fn request_cache(&self) -> &RequestCache {
        match self {
            CacheBackend::Local(cache) => cache,
            CacheBackend::Session(session) => session.request_cache(),
        }
    }

    fn request_cache_mut(&mut self) -> &mut RequestCache {
        match self {
            CacheBackend::Local(cache) => cache,
            CacheBackend::Session(session) => session.request_cache_mut(),
        }
    }
}

/// One translation session.
///
/// Lookups go to the request cache first, then to the providers for each
/// preferred language in turn. Whatever the providers answer is kept in the
/// request cache, and in the persistent cache once one is attached with
/// [`Translator::load_cache`].
pub struct Translator {
    providers: ProviderChain,
    registry: ProcessorRegistry,
    preferences: Vec<Language>,
    fallback: Language,
    cache_config: Option<CacheConfig>,
    backend: CacheBackend,
    undefined: UndefinedStrings,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Result<Self> {
        let fallback = Language::parse(&config.fallback)?;
        let preferences = expand_preferences(&config.preferences, &fallback);

        tracing::debug!(
            preferences = ?preferences.iter().map(Language::id).collect::<Vec<_>>(),
            fallback = %fallback,
            caching = config.cache.is_some(),
            "Created translator"
        );

        Ok(Self {
            providers: ProviderChain::new(),
            registry: ProcessorRegistry::with_builtins(),
            preferences,
            fallback,
            cache_config: config.cache,
            backend: CacheBackend::Local(RequestCache::new()),
            undefined: UndefinedStrings::new(),
        })
    }

    pub fn add_provider(&mut self, provider: impl Provider + 'static) {
        self.providers.add(provider, DEFAULT_PRIORITY);
    }

    /// Lower priority values are consulted first
    pub fn add_provider_with_priority(&mut self, provider: impl Provider + 'static, priority: i32) {
        self.providers.add(provider, priority);
    }

    pub fn register_processor(
        &mut self,
        id: ProcessorId,
        processor: impl Processor + 'static,
    ) -> Result<()> {
        self.registry.register(id, processor)
    }

    /// Attach the persistent cache `name` and hydrate the request cache from it.
    ///
    /// Does nothing when caching is not configured. An unreadable cache is
    /// logged and the session continues without hydration; translations are
    /// still saved when the session ends. Attaching a different name saves
    /// the current one first.
    pub fn load_cache(&mut self, name: &str) -> Option<&LoadReport> {
        let Some(config) = self.cache_config.clone() else {
            tracing::debug!(cache_name = %name, "Caching not configured, skipping cache load");
            return None;
        };

        let previous =
            std::mem::replace(&mut self.backend, CacheBackend::Local(RequestCache::new()));
        let cache = match previous {
            CacheBackend::Local(cache) => cache,
            CacheBackend::Session(session) => {
                let cache = session.request_cache().clone();
                let previous_name = session.cache_name().to_string();
                if let Err(e) = session.finish() {
                    tracing::warn!(
                        cache_name = %previous_name,
                        error = %e,
                        "Failed to save translation cache"
                    );
                }
                cache
            }
        };

        let engine = CacheEngine::from_config(config);
        let session = CacheSession::open_with(engine, name, &self.preferences, cache);
        self.backend = CacheBackend::Session(Box::new(session));

        match &self.backend {
            CacheBackend::Session(session) => session.load_report(),
            CacheBackend::Local(_) => None,
        }
    }

    /// Raw translations for `keys`, one per key in order, or empty when no
    /// preferred language has them all.
    ///
    /// An explicit `language` is tried before the configured preferences.
    pub fn fetch(&mut self, keys: &[String], language: Option<&Language>) -> Result<Vec<Translation>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let cache = self.backend.request_cache();
        if cache.has(keys) {
            // Repeated keys share one lookup entry, so answer per requested key
            let cached = cache.get(keys).and_then(|lookup| {
                keys.iter()
                    .map(|key| lookup.get(key).cloned().flatten())
                    .collect::<Option<Vec<_>>>()
            });
            if let Some(translations) = cached {
                tracing::debug!(keys = keys.len(), "Translation cache hit");
                return Ok(translations);
            }
        }

        let mut order: Vec<Language> = Vec::with_capacity(self.preferences.len() + 1);
        if let Some(language) = language {
            order.push(language.clone());
        }
        order.extend(self.preferences.iter().cloned());

        for preference in &order {
            let found = self.fetch_language(keys, preference)?;
            if !found.is_empty() {
                return Ok(found);
            }
        }

        tracing::debug!(keys = ?keys, "No provider could resolve translation keys");
        Ok(Vec::new())
    }

    /// Ask the providers for `keys` in exactly `language` and cache a complete answer
    fn fetch_language(&mut self, keys: &[String], language: &Language) -> Result<Vec<Translation>> {
        let found = self.providers.translations(language, keys);
        if found.is_empty() {
            return Ok(found);
        }

        let translations: Vec<Translation> = found
            .into_iter()
            .map(|translation| translation.with_language(language.clone()))
            .collect();
        for translation in &translations {
            self.registry.validate(translation)?;
        }

        tracing::debug!(language = %language, keys = keys.len(), "Resolved translations from providers");

        let entries: TranslationMap = keys
            .iter()
            .cloned()
            .zip(translations.iter().cloned())
            .collect();
        self.backend.request_cache_mut().set(entries);

        Ok(translations)
    }

    /// Render one key, or `None` when no provider knows it
    pub fn single(
        &mut self,
        key: &str,
        context: &Context,
        language: Option<&Language>,
    ) -> Result<Option<String>> {
        let keys = [key.to_string()];
        let found = self.fetch(&keys, language)?;
        match found.first() {
            Some(translation) => self.registry.apply(translation, context).map(Some),
            None => {
                self.undefined.record(key, context.clone());
                Ok(None)
            }
        }
    }

    /// Resolve `keys` together as one batch.
    ///
    /// When no preferred language has the whole batch, each key is looked up
    /// on its own in the fallback language instead.
    pub fn multiple<I, K>(&mut self, keys: I, language: Option<&Language>) -> Result<TranslationSection<'_>>
    where
        I: IntoIterator<Item = K>,
        K: Into<SectionKey>,
    {
        let requested: Vec<SectionKey> = keys.into_iter().map(Into::into).collect();
        let names: Vec<String> = requested.iter().map(|k| k.key.clone()).collect();

        let mut translations: Vec<Option<Translation>> =
            self.fetch(&names, language)?.into_iter().map(Some).collect();

        if translations.is_empty() && !names.is_empty() {
            tracing::debug!(
                keys = names.len(),
                fallback = %self.fallback,
                "Batch unresolved, falling back per key"
            );
            let fallback = self.fallback.clone();
            for name in &names {
                let found = self.fetch_language(std::slice::from_ref(name), &fallback)?;
                translations.push(found.into_iter().next());
            }
        }

        let items = requested
            .into_iter()
            .zip(translations)
            .map(|(requested, translation)| SectionItem {
                key: requested.key,
                context: requested.context,
                translation,
            })
            .collect();

        Ok(TranslationSection::new(
            items,
            &self.registry,
            &mut self.undefined,
        ))
    }

    /// Language order used for lookups, fallback last
    pub fn preferences(&self) -> &[Language] {
        &self.preferences
    }

    pub fn fallback(&self) -> &Language {
        &self.fallback
    }

    pub fn request_cache(&self) -> &RequestCache {
        self.backend.request_cache()
    }

    /// Keys no provider could resolve so far
    pub fn undefined(&self) -> &UndefinedStrings {
        &self.undefined
    }

    /// End the session, saving the attached cache.
    ///
    /// Without an attached cache this reports [`SaveOutcome::Disabled`].
    /// Dropping the translator instead saves on drop, logging any failure.
    pub fn finish(self) -> lexis_cache::Result<SaveOutcome> {
        match self.backend {
            CacheBackend::Local(_) => Ok(SaveOutcome::Disabled),
            CacheBackend::Session(session) => session.finish(),
        }
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache_name = match &self.backend {
            CacheBackend::Local(_) => None,
            CacheBackend::Session(session) => Some(session.cache_name()),
        };
        f.debug_struct("Translator")
            .field("providers", &self.providers)
            .field("registry", &self.registry)
            .field("preferences", &self.preferences)
            .field("fallback", &self.fallback)
            .field("cache_name", &cache_name)
            .finish()
    }
}
