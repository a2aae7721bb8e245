//! Filesystem-backed translation store

use super::paths::{
    cache_dir, group_path, meta_path, single_path, validate_cache_name, GROUPS_DIR,
};
use super::TranslationStore;
use crate::errors::{CacheError, RecoveryHint, Result, SerializationOp};
use crate::hashing::GroupId;
use crate::meta::Meta;
use crate::request::TranslationMap;
use lexis_core::Language;
use lexis_utils::write_atomic;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores JSON records under a base directory.
///
/// Every write goes to a temporary file that is renamed over the target, so
/// a previously good record is never left half-written.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Remove the meta record and single-key blobs of `cache_name`.
    ///
    /// Group blobs are shared between caches and stay in place. Returns
    /// `false` when there was nothing to remove.
    pub fn clear(&self, cache_name: &str) -> Result<bool> {
        validate_cache_name(cache_name)?;
        let dir = cache_dir(&self.base_dir, cache_name);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!(cache_name = %cache_name, "Cleared translation cache");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CacheError::io(dir, "remove cache directory", e)),
        }
    }

    /// Directory holding every group blob
    pub fn groups_dir(&self) -> PathBuf {
        self.base_dir.join(GROUPS_DIR)
    }

    /// Remove group blobs that no cache record lists, returning how many
    /// group directories were removed.
    ///
    /// Records that are expired still keep their groups. A record that
    /// cannot be decoded keeps nothing. Must not run while a session is
    /// saving, since groups are written before the record naming them.
    pub fn prune_groups(&self) -> Result<usize> {
        let referenced = self.referenced_groups()?;
        let groups_dir = self.groups_dir();
        let entries = match fs::read_dir(&groups_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::io(groups_dir, "list group blobs", e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&groups_dir, "list group blobs", e))?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name();
            if name.to_str().is_some_and(|id| referenced.contains(id)) {
                continue;
            }
            fs::remove_dir_all(&path)
                .map_err(|e| CacheError::io(&path, "remove group blobs", e))?;
            tracing::debug!(group = %name.to_string_lossy(), "Pruned unreferenced group");
            removed += 1;
        }
        Ok(removed)
    }

    /// Group ids listed by every readable cache record under the base directory
    fn referenced_groups(&self) -> Result<HashSet<String>> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(e) => return Err(CacheError::io(&self.base_dir, "list caches", e)),
        };

        let mut referenced = HashSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&self.base_dir, "list caches", e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !entry.path().is_dir() || validate_cache_name(&name).is_err() {
                continue;
            }
            if let Some(meta) = self.load_meta(&name)? {
                referenced.extend(meta.groups().iter().map(|g| g.as_str().to_string()));
            }
        }
        Ok(referenced)
    }

    fn read_record<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(path, "read cache record", e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable cache record"
                );
                Ok(None)
            }
        }
    }

    fn write_record<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let bytes = serde_json::to_vec(record).map_err(|e| CacheError::Serialization {
            key: path.display().to_string(),
            operation: SerializationOp::Serialize,
            source: Box::new(e),
            recovery_hint: RecoveryHint::Ignore,
        })?;
        write_atomic(path, &bytes).map_err(|e| CacheError::io(e.path, e.operation, e.source))?;
        tracing::trace!(path = %path.display(), bytes = bytes.len(), "Wrote cache record");
        Ok(())
    }
}

impl TranslationStore for FileStore {
    fn load_meta(&self, cache_name: &str) -> Result<Option<Meta>> {
        validate_cache_name(cache_name)?;
        self.read_record(&meta_path(&self.base_dir, cache_name))
    }

    fn load_single(&self, cache_name: &str, language: &Language) -> Result<TranslationMap> {
        validate_cache_name(cache_name)?;
        let path = single_path(&self.base_dir, cache_name, language);
        Ok(self.read_record(&path)?.unwrap_or_default())
    }

    fn load_group(&self, group: &GroupId, language: &Language) -> Result<TranslationMap> {
        let path = group_path(&self.base_dir, group, language);
        Ok(self.read_record(&path)?.unwrap_or_default())
    }

    fn save_meta(&self, cache_name: &str, meta: &Meta) -> Result<()> {
        validate_cache_name(cache_name)?;
        self.write_record(&meta_path(&self.base_dir, cache_name), meta)
    }

    fn write_single(
        &self,
        cache_name: &str,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        validate_cache_name(cache_name)?;
        self.write_record(&single_path(&self.base_dir, cache_name, language), entries)
    }

    fn write_group(
        &self,
        group: &GroupId,
        language: &Language,
        entries: &TranslationMap,
    ) -> Result<()> {
        self.write_record(&group_path(&self.base_dir, group, language), entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::Checksum;
    use crate::request::RequestCache;
    use chrono::Utc;
    use lexis_core::{ProcessorId, Translation};
    use std::time::Duration;
    use tempfile::TempDir;

    fn lang(tag: &str) -> Language {
        Language::parse(tag).unwrap()
    }

    fn blob(items: &[(&str, &str)], tag: &str) -> TranslationMap {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), Translation::new(*v).with_language(lang(tag))))
            .collect()
    }

    #[test]
    fn test_missing_records_read_as_absent() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        assert!(store.load_meta("app").unwrap().is_none());
        assert!(store.load_single("app", &lang("en")).unwrap().is_empty());
        assert!(store
            .load_group(&Checksum::of_key_set(["a", "b"]), &lang("en"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_meta_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let mut cache = RequestCache::new();
        cache.set(blob(&[("a", "A")], "en"));
        let meta = Meta::from_request_cache(&cache, Duration::from_secs(60), Utc::now());

        store.save_meta("app", &meta).unwrap();

        assert!(temp.path().join("app").join("meta.json").exists());
        assert_eq!(store.load_meta("app").unwrap(), Some(meta));
    }

    #[test]
    fn test_single_blobs_are_split_by_language() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        let mut entries = blob(&[("a", "Hola")], "es");
        entries.extend(blob(&[("b", "Hello {name}")], "en-us"));
        entries["b"] = entries["b"].clone().with_processor(ProcessorId::replace());
        store.save_single("app", &entries).unwrap();

        let es = store.load_single("app", &lang("es")).unwrap();
        let en_us = store.load_single("app", &lang("en-us")).unwrap();
        assert_eq!(es.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(en_us["b"], entries["b"]);
        assert_eq!(en_us["b"].processors(), &[ProcessorId::replace()]);
    }

    #[test]
    fn test_group_blob_under_first_language() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let entries = blob(&[("title", "Titel"), ("body", "Text")], "de");
        let id = Checksum::of_key_set(entries.keys());

        store.save_group(&id, &entries).unwrap();

        let path = temp
            .path()
            .join("groups")
            .join(id.as_str())
            .join("de-de.json");
        assert!(path.exists());
        assert_eq!(store.load_group(&id, &lang("de")).unwrap(), entries);
        assert!(store.load_group(&id, &lang("en")).unwrap().is_empty());
    }

    #[test]
    fn test_mixed_language_group_is_rejected_without_writing() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let mut entries = blob(&[("title", "Titel")], "de");
        entries.extend(blob(&[("body", "Body")], "en"));
        let id = Checksum::of_key_set(entries.keys());

        let result = store.save_group(&id, &entries);

        assert!(matches!(result, Err(CacheError::InvalidGroup { .. })));
        assert!(!temp.path().join("groups").exists());
    }

    #[test]
    fn test_corrupt_blob_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        fs::create_dir_all(temp.path().join("app")).unwrap();
        fs::write(temp.path().join("app").join("en-en.json"), b"{not json").unwrap();
        fs::write(temp.path().join("app").join("meta.json"), b"[1, 2, 3]").unwrap();

        assert!(store.load_single("app", &lang("en")).unwrap().is_empty());
        assert!(store.load_meta("app").unwrap().is_none());
    }

    #[test]
    fn test_rewrite_replaces_whole_blob() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        store
            .save_single("app", &blob(&[("a", "1"), ("b", "2")], "en"))
            .unwrap();
        store.save_single("app", &blob(&[("c", "3")], "en")).unwrap();

        let loaded = store.load_single("app", &lang("en")).unwrap();
        assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["c"]);

        // No temporary files are left behind
        let leftovers: Vec<_> = fs::read_dir(temp.path().join("app"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_invalid_cache_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        assert!(matches!(
            store.load_meta("../escape"),
            Err(CacheError::InvalidCacheName { .. })
        ));
        assert!(matches!(
            store.save_single("groups", &blob(&[("a", "A")], "en")),
            Err(CacheError::InvalidCacheName { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        store.save_single("app", &blob(&[("a", "A")], "en")).unwrap();
        let group = blob(&[("x", "X"), ("y", "Y")], "en");
        let id = Checksum::of_key_set(group.keys());
        store.save_group(&id, &group).unwrap();

        assert!(store.clear("app").unwrap());
        assert!(!store.clear("app").unwrap());
        assert!(store.load_single("app", &lang("en")).unwrap().is_empty());
        assert!(store.groups_dir().join(id.as_str()).exists());
    }

    #[test]
    fn test_prune_groups_keeps_referenced_blobs() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        let kept = blob(&[("title", "Title"), ("body", "Body")], "en");
        let kept_id = Checksum::of_key_set(kept.keys());
        let orphan = blob(&[("x", "X"), ("y", "Y")], "en");
        let orphan_id = Checksum::of_key_set(orphan.keys());
        store.save_group(&kept_id, &kept).unwrap();
        store.save_group(&orphan_id, &orphan).unwrap();

        let mut cache = RequestCache::new();
        cache.set(kept.clone());
        let expired = Meta::from_request_cache(&cache, Duration::ZERO, Utc::now());
        store.save_meta("web", &expired).unwrap();

        assert_eq!(store.prune_groups().unwrap(), 1);
        assert_eq!(store.load_group(&kept_id, &lang("en")).unwrap(), kept);
        assert!(!store.groups_dir().join(orphan_id.as_str()).exists());

        // Once the only record is cleared its groups go too
        assert!(store.clear("web").unwrap());
        assert_eq!(store.prune_groups().unwrap(), 1);
        assert!(!store.groups_dir().join(kept_id.as_str()).exists());
        assert_eq!(store.prune_groups().unwrap(), 0);
    }

    #[test]
    fn test_prune_groups_on_empty_base() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("missing"));
        assert_eq!(store.prune_groups().unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_storage_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        store.save_single("app", &blob(&[("a", "A")], "en")).unwrap();
        let dir = temp.path().join("app");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o000)).unwrap();

        let result = store.load_single("app", &lang("en"));

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        // Root ignores permission bits, so only assert when the read was refused
        if let Err(e) = result {
            assert!(e.is_storage_unavailable());
        }
    }
}
