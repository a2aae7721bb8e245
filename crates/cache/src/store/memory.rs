//! In-memory translation store that records every access

use super::TranslationStore;
use crate::errors::{CacheError, RecoveryHint, Result};
use crate::hashing::GroupId;
use crate::meta::Meta;
use crate::request::TranslationMap;
use lexis_core::Language;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// One read or write against a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAccess {
    Meta(String),
    Single(String, Language),
    Group(GroupId, Language),
}

#[derive(Debug, Default)]
struct MemoryInner {
    metas: HashMap<String, Meta>,
    singles: HashMap<(String, Language), TranslationMap>,
    groups: HashMap<(GroupId, Language), TranslationMap>,
    failing_groups: HashSet<GroupId>,
    reads: Vec<StoreAccess>,
    writes: Vec<StoreAccess>,
}

/// Store double for tests of code built on the cache engine.
///
/// Seeding through the `insert_*` methods is not counted; everything going
/// through [`TranslationStore`] is.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_meta(&self, cache_name: &str, meta: Meta) {
        self.inner.lock().metas.insert(cache_name.to_string(), meta);
    }

    pub fn insert_single(&self, cache_name: &str, language: &Language, entries: TranslationMap) {
        self.inner
            .lock()
            .singles
            .insert((cache_name.to_string(), language.clone()), entries);
    }

    pub fn insert_group(&self, group: &GroupId, language: &Language, entries: TranslationMap) {
        self.inner
            .lock()
            .groups
            .insert((group.clone(), language.clone()), entries);
    }

    /// Make every later `load_group` of `group` fail as if storage were unreachable
    pub fn fail_group(&self, group: &GroupId) {
        self.inner.lock().failing_groups.insert(group.clone());
    }

    pub fn reads(&self) -> Vec<StoreAccess> {
        self.inner.lock().reads.clone()
    }

    pub fn writes(&self) -> Vec<StoreAccess> {
        self.inner.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.inner.lock().writes.len()
    }

    pub fn meta(&self, cache_name: &str) -> Option<Meta> {
        self.inner.lock().metas.get(cache_name).cloned()
    }

    pub fn single(&self, cache_name: &str, language: &Language) -> Option<TranslationMap> {
        self.inner
            .lock()
            .singles
            .get(&(cache_name.to_string(), language.clone()))
            .cloned()
    }

    pub fn group(&self, group: &GroupId, language: &Language) -> Option<TranslationMap> {
        self.inner
            .lock()
            .groups
            .get(&(group.clone(), language.clone()))
            .cloned()
    }

    pub fn reset_counters(&self) {
        let mut inner = self.inner.lock();
        inner.reads.clear();
        inner.writes.clear();
    }
}

impl TranslationStore for MemoryStore {
    fn load_meta(&self, cache_name: &str) -> Result<Option<Meta>> {
        let mut inner = self.inner.lock();
        inner.reads.push(StoreAccess::Meta(cache_name.to_string()));
        Ok(inner.metas.get(cache_name).cloned())
    }

    fn load_single(&self, cache_name: &str, language: &Language) -> Result<TranslationMap> {
        let mut inner = self.inner.lock();
        inner
            .reads
            .push(StoreAccess::Single(cache_name.to_string(), language.clone()));
        Ok(inner
            .singles
            .get(&(cache_name.to_string(), language.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn load_group(&self, group: &GroupId, language: &Language) -> Result<TranslationMap> {
        let mut inner = self.inner.lock();
        inner
            .reads
            .push(StoreAccess::Group(group.clone(), language.clone()));
        if inner.failing_groups.contains(group) {
            return Err(CacheError::StoreUnavailable {
                reason: format!("group {} is unreachable", group.short()),
                recovery_hint: RecoveryHint::UseFallback,
            });
        }
        Ok(inner
            .groups
            .get(&(group.clone(), language.clone()))
            .cloned()
            .unwrap_or_default())
    }

    fn save_meta(&self, cache_name: &str, meta: &Meta) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.writes.push(StoreAccess::Meta(cache_name.to_string()));
        inner.metas.insert(cache_name.to_string(), meta.clone());
        Ok(())
    }

    fn write_single(
        &self,
        cache_name: &str,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .writes
            .push(StoreAccess::Single(cache_name.to_string(), language.clone()));
        inner
            .singles
            .insert((cache_name.to_string(), language.clone()), entries.clone());
        Ok(())
    }

    fn write_group(
        &self,
        group: &GroupId,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        let mut inner = self.inner.lock();
        inner
            .writes
            .push(StoreAccess::Group(group.clone(), language.clone()));
        inner
            .groups
            .insert((group.clone(), language.clone()), entries.clone());
        Ok(())
    }
}
