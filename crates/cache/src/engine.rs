//! Load and save protocols between a request cache and a store

use crate::config::CacheConfig;
use crate::errors::{CacheError, Result};
use crate::hashing::Checksum;
use crate::meta::Meta;
use crate::request::RequestCache;
use crate::store::{FileStore, TranslationStore};
use chrono::{DateTime, Utc};
use lexis_core::Language;
use std::fmt;

/// Where the engine is in the load protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No usable record; every lookup goes to the providers
    Cold,
    /// A record was read and is being checked
    MetaLoaded,
    /// The record was past its expiry and has been dropped
    Expired,
    /// Blobs are being read into the request cache
    Hydrating,
    /// Hydration finished
    Ready,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            LoadState::Cold => "cold",
            LoadState::MetaLoaded => "meta-loaded",
            LoadState::Expired => "expired",
            LoadState::Hydrating => "hydrating",
            LoadState::Ready => "ready",
        };
        f.write_str(state)
    }
}

/// What a load put into the request cache
#[derive(Debug)]
pub struct LoadReport {
    pub state: LoadState,
    /// Single keys hydrated
    pub singles: usize,
    /// Groups hydrated
    pub groups: usize,
    /// Blob reads that failed; each only cost the entries it would have provided
    pub errors: Vec<CacheError>,
}

impl LoadReport {
    fn new(state: LoadState) -> Self {
        Self {
            state,
            singles: 0,
            groups: 0,
            errors: Vec::new(),
        }
    }
}

/// Result of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The cache mode does not allow writing
    Disabled,
    /// The key set matches the record loaded or last saved; nothing was written
    Unchanged,
    /// A new record was written
    Written { languages: usize, groups: usize },
}

#[derive(Debug)]
struct LoadedMeta {
    cache_name: String,
    meta: Meta,
}

/// Drives [`RequestCache`] hydration and persistence over a [`TranslationStore`]
#[derive(Debug)]
pub struct CacheEngine<S> {
    store: S,
    config: CacheConfig,
    loaded: Option<LoadedMeta>,
    state: LoadState,
}

impl CacheEngine<FileStore> {
    /// Engine over a [`FileStore`] rooted at the configured base directory
    pub fn from_config(config: CacheConfig) -> Self {
        let store = FileStore::new(config.base_dir.clone());
        Self::new(store, config)
    }
}

impl<S: TranslationStore> CacheEngine<S> {
    pub fn new(store: S, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            loaded: None,
            state: LoadState::Cold,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The record the next save compares against
    pub fn loaded_meta(&self) -> Option<&Meta> {
        self.loaded.as_ref().map(|loaded| &loaded.meta)
    }

    pub fn load(
        &mut self,
        cache_name: &str,
        preferences: &[Language],
        cache: &mut RequestCache,
    ) -> Result<LoadReport> {
        self.load_at(cache_name, preferences, cache, Utc::now())
    }

    /// Hydrate `cache` from the record of `cache_name` as seen at `now`.
    ///
    /// Failing to read the record is an error. Failing to read an individual
    /// blob is collected in the report and only loses that blob's entries.
    pub fn load_at(
        &mut self,
        cache_name: &str,
        preferences: &[Language],
        cache: &mut RequestCache,
        now: DateTime<Utc>,
    ) -> Result<LoadReport> {
        self.loaded = None;
        self.state = LoadState::Cold;

        if !self.config.mode.is_readable() {
            tracing::debug!(cache_name = %cache_name, mode = %self.config.mode, "Cache load skipped");
            return Ok(LoadReport::new(LoadState::Cold));
        }

        let Some(meta) = self.store.load_meta(cache_name)? else {
            tracing::debug!(cache_name = %cache_name, "No cache record, starting cold");
            return Ok(LoadReport::new(LoadState::Cold));
        };
        self.transition(cache_name, LoadState::MetaLoaded);

        if meta.is_expired(now) {
            tracing::debug!(
                cache_name = %cache_name,
                expired_at = %meta.expires(),
                "Dropping expired cache record"
            );
            self.transition(cache_name, LoadState::Expired);
            return Ok(LoadReport::new(LoadState::Expired));
        }

        self.transition(cache_name, LoadState::Hydrating);
        let mut report = LoadReport::new(LoadState::Hydrating);
        self.hydrate_singles(cache_name, &meta, preferences, cache, &mut report);
        self.hydrate_groups(&meta, preferences, cache, &mut report);

        self.loaded = Some(LoadedMeta {
            cache_name: cache_name.to_string(),
            meta,
        });
        self.transition(cache_name, LoadState::Ready);
        report.state = LoadState::Ready;

        tracing::debug!(
            cache_name = %cache_name,
            singles = report.singles,
            groups = report.groups,
            failed_reads = report.errors.len(),
            "Cache hydrated"
        );
        Ok(report)
    }

    fn hydrate_singles(
        &self,
        cache_name: &str,
        meta: &Meta,
        preferences: &[Language],
        cache: &mut RequestCache,
        report: &mut LoadReport,
    ) {
        let mut needed: Vec<&str> = meta
            .keys()
            .iter()
            .map(String::as_str)
            .filter(|key| !cache.has_single(key))
            .collect();

        for language in preferences {
            if needed.is_empty() {
                break;
            }

            let blob = match self.store.load_single(cache_name, language) {
                Ok(blob) => blob,
                Err(e) => {
                    tracing::warn!(
                        cache_name = %cache_name,
                        language = %language,
                        error = %e,
                        "Skipping unreadable single-key blob"
                    );
                    report.errors.push(e);
                    continue;
                }
            };

            needed.retain(|key| match blob.get(*key) {
                Some(translation) => {
                    cache.set_single(*key, translation.clone());
                    report.singles += 1;
                    false
                }
                None => true,
            });
        }

        if !needed.is_empty() {
            tracing::debug!(
                cache_name = %cache_name,
                missing = needed.len(),
                "Some cached keys were not found in any preferred language"
            );
        }
    }

    fn hydrate_groups(
        &self,
        meta: &Meta,
        preferences: &[Language],
        cache: &mut RequestCache,
        report: &mut LoadReport,
    ) {
        for group in meta.groups() {
            if cache.depended_groups().contains_key(group) {
                continue;
            }

            for language in preferences {
                let blob = match self.store.load_group(group, language) {
                    Ok(blob) => blob,
                    Err(e) => {
                        tracing::warn!(
                            group = %group.short(),
                            language = %language,
                            error = %e,
                            "Skipping unreadable group"
                        );
                        report.errors.push(e);
                        break;
                    }
                };

                if blob.is_empty() {
                    continue;
                }

                if blob.len() < 2 || Checksum::of_key_set(blob.keys()) != *group {
                    tracing::warn!(
                        group = %group.short(),
                        language = %language,
                        "Group blob does not match its key set, ignoring"
                    );
                    break;
                }

                cache.set(blob);
                report.groups += 1;
                break;
            }
        }
    }

    pub fn save(&mut self, cache_name: &str, cache: &RequestCache) -> Result<SaveOutcome> {
        self.save_at(cache_name, cache, Utc::now())
    }

    /// Persist `cache` unless its key set matches the last record seen for `cache_name`.
    ///
    /// Blobs are written before the record that lists them.
    pub fn save_at(
        &mut self,
        cache_name: &str,
        cache: &RequestCache,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        if !self.config.mode.is_writable() {
            tracing::debug!(cache_name = %cache_name, mode = %self.config.mode, "Cache save skipped");
            return Ok(SaveOutcome::Disabled);
        }

        let checksum = cache.fingerprint();
        if let Some(loaded) = &self.loaded {
            if loaded.cache_name == cache_name && loaded.meta.matches_checksum(&checksum) {
                tracing::debug!(
                    cache_name = %cache_name,
                    checksum = %checksum.short(),
                    "Cache unchanged, nothing to save"
                );
                return Ok(SaveOutcome::Unchanged);
            }
        }

        let languages = crate::store::partition_by_language(cache.single_translations());
        for (language, blob) in &languages {
            self.store.write_single(cache_name, language, blob)?;
        }

        let mut groups = 0;
        for (id, entries) in cache.depended_groups() {
            match self.store.save_group(id, entries) {
                Ok(()) => groups += 1,
                Err(e @ CacheError::InvalidGroup { .. }) => {
                    tracing::warn!(group = %id.short(), error = %e, "Not caching group");
                }
                Err(e) => return Err(e),
            }
        }

        let meta = Meta::from_request_cache(cache, self.config.ttl, now);
        self.store.save_meta(cache_name, &meta)?;

        tracing::debug!(
            cache_name = %cache_name,
            checksum = %checksum.short(),
            languages = languages.len(),
            groups,
            "Cache saved"
        );
        self.loaded = Some(LoadedMeta {
            cache_name: cache_name.to_string(),
            meta,
        });

        Ok(SaveOutcome::Written {
            languages: languages.len(),
            groups,
        })
    }

    fn transition(&mut self, cache_name: &str, next: LoadState) {
        tracing::trace!(cache_name = %cache_name, from = %self.state, to = %next, "Cache load state");
        self.state = next;
    }
}
