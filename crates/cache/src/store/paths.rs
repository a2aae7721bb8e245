//! On-disk layout of the file store
//!
//! ```text
//! <base>/<cache_name>/meta.json
//! <base>/<cache_name>/<code-region>.json
//! <base>/groups/<group_id>/<code-region>.json
//! ```

use crate::errors::{CacheError, RecoveryHint, Result};
use crate::hashing::GroupId;
use lexis_core::Language;
use std::path::{Path, PathBuf};

pub(super) const GROUPS_DIR: &str = "groups";
const META_FILE: &str = "meta.json";
const BLOB_EXTENSION: &str = "json";

/// Reject names that would escape the base directory or collide with the group tree
pub fn validate_cache_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.starts_with('.') {
        Some("name must not start with '.'")
    } else if name == GROUPS_DIR {
        Some("name is reserved for group storage")
    } else if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CacheError::InvalidCacheName {
            name: name.to_string(),
            reason: reason.to_string(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Choose a plain directory name for the cache".to_string(),
            },
        }),
        None => Ok(()),
    }
}

#[inline]
pub fn cache_dir(base: &Path, cache_name: &str) -> PathBuf {
    base.join(cache_name)
}

#[inline]
pub fn meta_path(base: &Path, cache_name: &str) -> PathBuf {
    cache_dir(base, cache_name).join(META_FILE)
}

#[inline]
pub fn single_path(base: &Path, cache_name: &str, language: &Language) -> PathBuf {
    cache_dir(base, cache_name).join(blob_name(language))
}

#[inline]
pub fn group_path(base: &Path, group: &GroupId, language: &Language) -> PathBuf {
    base.join(GROUPS_DIR)
        .join(group.as_str())
        .join(blob_name(language))
}

fn blob_name(language: &Language) -> String {
    format!("{}.{BLOB_EXTENSION}", language.id())
}
