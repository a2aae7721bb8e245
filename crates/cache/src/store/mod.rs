//! Persistent storage for request caches
//!
//! A store keeps, per cache name, one [`Meta`] record and one single-key blob
//! per language, plus one blob per group and language. Groups are addressed
//! by their id alone, so caches that resolve the same batch share its blobs.

mod file;
mod memory;
mod paths;

pub use file::FileStore;
pub use memory::{MemoryStore, StoreAccess};

use crate::errors::{CacheError, RecoveryHint, Result};
use crate::hashing::GroupId;
use crate::meta::Meta;
use crate::request::TranslationMap;
use indexmap::IndexMap;
use lexis_core::Language;
use std::sync::Arc;

/// Durable storage consulted by the cache engine.
///
/// Reads report an absent or unreadable blob as empty (or `None` for a
/// record); only a failure to reach the storage itself is an error. Writes
/// replace a blob whole or leave it untouched.
pub trait TranslationStore {
    /// The invalidation record of `cache_name`, if one exists
    fn load_meta(&self, cache_name: &str) -> Result<Option<Meta>>;

    /// Single-key translations of `cache_name` stored for `language`
    fn load_single(&self, cache_name: &str, language: &Language) -> Result<TranslationMap>;

    /// Translations of `group` stored for `language`
    fn load_group(&self, group: &GroupId, language: &Language) -> Result<TranslationMap>;

    fn save_meta(&self, cache_name: &str, meta: &Meta) -> Result<()>;

    /// Replace the single-key blob of `cache_name` for `language`
    fn write_single(
        &self,
        cache_name: &str,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()>;

    /// Replace the blob of `group` for `language`
    fn write_group(
        &self,
        group: &GroupId,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()>;

    /// Persist single-key translations, one blob per language they carry
    fn save_single(&self, cache_name: &str, entries: &TranslationMap) -> Result<()> {
        for (language, blob) in partition_by_language(entries) {
            self.write_single(cache_name, &language, &blob)?;
        }
        Ok(())
    }

    /// Persist a group under the language of its first entry.
    ///
    /// Every entry must carry that same language; a group is never split
    /// across languages. An empty group writes nothing.
    fn save_group(&self, group: &GroupId, entries: &TranslationMap) -> Result<()> {
        match group_language(group, entries)? {
            Some(language) => self.write_group(group, &language, entries),
            None => Ok(()),
        }
    }
}

impl<T: TranslationStore + ?Sized> TranslationStore for Arc<T> {
    fn load_meta(&self, cache_name: &str) -> Result<Option<Meta>> {
        (**self).load_meta(cache_name)
    }

    fn load_single(&self, cache_name: &str, language: &Language) -> Result<TranslationMap> {
        (**self).load_single(cache_name, language)
    }

    fn load_group(&self, group: &GroupId, language: &Language) -> Result<TranslationMap> {
        (**self).load_group(group, language)
    }

    fn save_meta(&self, cache_name: &str, meta: &Meta) -> Result<()> {
        (**self).save_meta(cache_name, meta)
    }

    fn write_single(
        &self,
        cache_name: &str,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        (**self).write_single(cache_name, language, entries)
    }

    fn write_group(
        &self,
        group: &GroupId,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        (**self).write_group(group, language, entries)
    }
}

impl<T: TranslationStore + ?Sized> TranslationStore for Box<T> {
    fn load_meta(&self, cache_name: &str) -> Result<Option<Meta>> {
        (**self).load_meta(cache_name)
    }

    fn load_single(&self, cache_name: &str, language: &Language) -> Result<TranslationMap> {
        (**self).load_single(cache_name, language)
    }

    fn load_group(&self, group: &GroupId, language: &Language) -> Result<TranslationMap> {
        (**self).load_group(group, language)
    }

    fn save_meta(&self, cache_name: &str, meta: &Meta) -> Result<()> {
        (**self).save_meta(cache_name, meta)
    }

    fn write_single(
        &self,
        cache_name: &str,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        (**self).write_single(cache_name, language, entries)
    }

    fn write_group(
        &self,
        group: &GroupId,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        (**self).write_group(group, language, entries)
    }
}

/// Split translations by their bound language, keeping first-seen order.
///
/// Translations with no language cannot be addressed on load and are skipped.
pub fn partition_by_language(entries: &TranslationMap) -> IndexMap<Language, TranslationMap> {
    let mut blobs: IndexMap<Language, TranslationMap> = IndexMap::new();
    for (key, translation) in entries {
        match translation.language() {
            Some(language) => {
                blobs
                    .entry(language.clone())
                    .or_default()
                    .insert(key.clone(), translation.clone());
            }
            None => tracing::warn!(key = %key, "Not caching translation without a language"),
        }
    }
    blobs
}

/// The one language a group is stored under, `None` for an empty group
pub fn group_language(group: &GroupId, entries: &TranslationMap) -> Result<Option<Language>> {
    let Some((first_key, first)) = entries.first() else {
        return Ok(None);
    };
    let language = first
        .language()
        .cloned()
        .ok_or_else(|| invalid_group(group, format!("entry '{first_key}' has no language")))?;

    if let Some((key, other)) = entries
        .iter()
        .find(|(_, t)| t.language() != Some(&language))
    {
        let found = other
            .language()
            .map(Language::id)
            .unwrap_or_else(|| "none".to_string());
        return Err(invalid_group(
            group,
            format!("entry '{key}' is in {found}, expected {language}"),
        ));
    }

    Ok(Some(language))
}

fn invalid_group(group: &GroupId, reason: String) -> CacheError {
    CacheError::InvalidGroup {
        group: group.to_string(),
        reason,
        recovery_hint: RecoveryHint::Ignore,
    }
}
