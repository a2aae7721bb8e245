//! In-process translation cache for one resolution session

use crate::hashing::{Checksum, GroupId};
use indexmap::IndexMap;
use lexis_core::Translation;
use std::collections::HashMap;

/// Translations keyed by message key, in insertion order
pub type TranslationMap = IndexMap<String, Translation>;

/// Result of [`RequestCache::get`]: every requested key, with its translation when known
pub type Lookup = IndexMap<String, Option<Translation>>;

/// Session-scoped store of resolved translations.
///
/// Keys requested on their own live in the *single* namespace; keys requested
/// together as a batch live in a *group* keyed by the checksum of the batch's
/// key set. The namespaces are independent: a key may be cached once as a
/// single and once inside a group. Within the group namespace a key belongs to
/// at most one group; setting a batch that shares a key with an existing group
/// evicts that group.
#[derive(Debug, Default, Clone)]
pub struct RequestCache {
    single: TranslationMap,
    groups: IndexMap<GroupId, TranslationMap>,
    group_keys: IndexMap<GroupId, Vec<String>>,
    key_group: HashMap<String, GroupId>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `keys` can be answered from this cache.
    ///
    /// One key is looked up in the single namespace; several keys are looked
    /// up as a group by the checksum of their set.
    pub fn has<S: AsRef<str>>(&self, keys: &[S]) -> bool {
        match keys {
            [] => false,
            [key] => self.single.contains_key(key.as_ref()),
            _ => self
                .groups
                .contains_key(&Checksum::of_key_set(keys.iter().map(|k| k.as_ref()))),
        }
    }

    /// True if `key` is cached in the single namespace
    pub fn has_single(&self, key: &str) -> bool {
        self.single.contains_key(key)
    }

    /// Store resolved translations.
    ///
    /// One entry goes to the single namespace (overwriting any previous
    /// value, keeping the key's original position). Several entries are stored
    /// together as one group. An empty map is ignored.
    pub fn set(&mut self, entries: TranslationMap) {
        match entries.len() {
            0 => {}
            1 => {
                if let Some((key, translation)) = entries.into_iter().next() {
                    self.single.insert(key, translation);
                }
            }
            _ => self.set_group(entries),
        }
    }

    /// Store one translation in the single namespace
    pub fn set_single(&mut self, key: impl Into<String>, translation: Translation) {
        self.single.insert(key.into(), translation);
    }

    fn set_group(&mut self, entries: TranslationMap) {
        let id = Checksum::of_key_set(entries.keys());

        let overlapping: Vec<GroupId> = entries
            .keys()
            .filter_map(|key| self.key_group.get(key))
            .filter(|owner| **owner != id)
            .cloned()
            .collect();
        for owner in overlapping {
            tracing::debug!(
                evicted = %owner.short(),
                group = %id.short(),
                "Evicting group that shares keys with a new batch"
            );
            self.remove_group(&owner);
        }

        let keys: Vec<String> = entries.keys().cloned().collect();
        for key in &keys {
            self.key_group.insert(key.clone(), id.clone());
        }
        self.group_keys.insert(id.clone(), keys);
        self.groups.insert(id, entries);
    }

    fn remove_group(&mut self, id: &GroupId) {
        if let Some(keys) = self.group_keys.shift_remove(id) {
            for key in keys {
                if self.key_group.get(&key) == Some(id) {
                    self.key_group.remove(&key);
                }
            }
        }
        self.groups.shift_remove(id);
    }

    /// Look up translations.
    ///
    /// A single key always yields a one-entry map whose value is `None` when
    /// the key was never set; callers must check [`RequestCache::has`] or the
    /// value. Several keys yield `None` when no group matches their set, else
    /// the group's translations projected onto the requested keys in request
    /// order.
    pub fn get<S: AsRef<str>>(&self, keys: &[S]) -> Option<Lookup> {
        match keys {
            [] => None,
            [key] => {
                let key = key.as_ref();
                let mut lookup = Lookup::with_capacity(1);
                lookup.insert(key.to_string(), self.single.get(key).cloned());
                Some(lookup)
            }
            _ => {
                let id = Checksum::of_key_set(keys.iter().map(|k| k.as_ref()));
                let group = self.groups.get(&id)?;
                Some(
                    keys.iter()
                        .map(|key| {
                            let key = key.as_ref();
                            (key.to_string(), group.get(key).cloned())
                        })
                        .collect(),
                )
            }
        }
    }

    /// Checksum over the single-key set and the group-id set
    pub fn fingerprint(&self) -> Checksum {
        Checksum::fingerprint(self.single.keys().map(String::as_str), self.groups.keys())
    }

    /// Every group with its translations, in insertion order
    pub fn depended_groups(&self) -> &IndexMap<GroupId, TranslationMap> {
        &self.groups
    }

    /// Keys cached in the single namespace, in insertion order
    pub fn single_keys(&self) -> Vec<String> {
        self.single.keys().cloned().collect()
    }

    /// Keys of one group, in the order the batch was set
    pub fn group_keys(&self, id: &GroupId) -> &[String] {
        self.group_keys.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The single-namespace translations
    pub fn single_translations(&self) -> &TranslationMap {
        &self.single
    }

    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.groups.is_empty()
    }

    /// Number of single entries plus number of groups
    pub fn len(&self) -> usize {
        self.single.len() + self.groups.len()
    }
}
