//! Scoped ownership of a request cache and its engine

use crate::engine::{CacheEngine, LoadReport, SaveOutcome};
use crate::errors::Result;
use crate::request::RequestCache;
use crate::store::TranslationStore;
use lexis_core::Language;

/// One resolution session against a named cache.
///
/// Opening loads the cache; the session saves exactly once, either through
/// [`CacheSession::finish`] or when it is dropped, whichever comes first.
/// Drop covers early returns and unwinding, where a failed save is only
/// logged.
pub struct CacheSession<S: TranslationStore> {
    engine: CacheEngine<S>,
    cache: RequestCache,
    cache_name: String,
    load_report: Option<LoadReport>,
    finished: bool,
}

impl<S: TranslationStore> CacheSession<S> {
    /// Start a session with an empty request cache
    pub fn open(
        engine: CacheEngine<S>,
        cache_name: impl Into<String>,
        preferences: &[Language],
    ) -> Self {
        Self::open_with(engine, cache_name, preferences, RequestCache::new())
    }

    /// Start a session over translations resolved before the cache was attached.
    ///
    /// A failed load leaves the session cold; translations are still resolved
    /// and saved at the end.
    pub fn open_with(
        mut engine: CacheEngine<S>,
        cache_name: impl Into<String>,
        preferences: &[Language],
        mut cache: RequestCache,
    ) -> Self {
        let cache_name = cache_name.into();
        let load_report = match engine.load(&cache_name, preferences, &mut cache) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(
                    cache_name = %cache_name,
                    error = %e,
                    recovery_hint = ?e.recovery_hint(),
                    "Translation cache unavailable, continuing without it"
                );
                None
            }
        };

        Self {
            engine,
            cache,
            cache_name,
            load_report,
            finished: false,
        }
    }

    pub fn request_cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn request_cache_mut(&mut self) -> &mut RequestCache {
        &mut self.cache
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn engine(&self) -> &CacheEngine<S> {
        &self.engine
    }

    /// `None` when the cache could not be read
    pub fn load_report(&self) -> Option<&LoadReport> {
        self.load_report.as_ref()
    }

    /// Save now and report the outcome
    pub fn finish(mut self) -> Result<SaveOutcome> {
        self.finished = true;
        self.engine.save(&self.cache_name, &self.cache)
    }
}

impl<S: TranslationStore> Drop for CacheSession<S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        match self.engine.save(&self.cache_name, &self.cache) {
            Ok(outcome) => {
                tracing::debug!(cache_name = %self.cache_name, ?outcome, "Translation cache saved on drop");
            }
            Err(e) => {
                tracing::warn!(
                    cache_name = %self.cache_name,
                    error = %e,
                    recovery_hint = ?e.recovery_hint(),
                    "Failed to save translation cache"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::store::MemoryStore;
    use lexis_core::Translation;
    use std::sync::Arc;

    fn en() -> Language {
        Language::parse("en").unwrap()
    }

    fn engine(store: &Arc<MemoryStore>) -> CacheEngine<Arc<MemoryStore>> {
        CacheEngine::new(Arc::clone(store), CacheConfig::default())
    }

    #[test]
    fn test_drop_saves_once() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut session = CacheSession::open(engine(&store), "app", &[en()]);
            session
                .request_cache_mut()
                .set_single("title", Translation::new("Title").with_language(en()));
        }

        assert!(store.meta("app").is_some());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_finish_disarms_drop() {
        let store = Arc::new(MemoryStore::new());
        let mut session = CacheSession::open(engine(&store), "app", &[en()]);
        session
            .request_cache_mut()
            .set_single("title", Translation::new("Title").with_language(en()));

        let outcome = session.finish().unwrap();

        assert!(matches!(outcome, SaveOutcome::Written { .. }));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_early_return_still_saves() {
        fn resolve(store: &Arc<MemoryStore>, provider_ok: bool) -> std::result::Result<(), String> {
            let mut session = CacheSession::open(engine(store), "app", &[en()]);
            session
                .request_cache_mut()
                .set_single("title", Translation::new("Title").with_language(en()));
            if !provider_ok {
                return Err("provider failed".to_string());
            }
            session.finish().map_err(|e| e.to_string())?;
            Ok(())
        }

        let store = Arc::new(MemoryStore::new());
        assert!(resolve(&store, false).is_err());
        assert!(store.meta("app").is_some());
    }

    #[test]
    fn test_reopened_session_hydrates_and_skips_unchanged_save() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut session = CacheSession::open(engine(&store), "app", &[en()]);
            session
                .request_cache_mut()
                .set_single("title", Translation::new("Title").with_language(en()));
        }
        store.reset_counters();

        let session = CacheSession::open(engine(&store), "app", &[en()]);
        assert!(session.request_cache().has(&["title"]));
        assert_eq!(session.load_report().map(|r| r.singles), Some(1));
        drop(session);

        assert_eq!(store.write_count(), 0);
    }
}
