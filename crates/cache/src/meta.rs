//! The persisted invalidation record

use crate::hashing::{Checksum, GroupId};
use crate::request::RequestCache;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Expiry, fingerprint and key manifest of one saved request cache.
///
/// Stored as a flat record; the expiry is kept in whole seconds so a record
/// reads back exactly as it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(with = "chrono::serde::ts_seconds")]
    expires: DateTime<Utc>,
    checksum: Checksum,
    keys: Vec<String>,
    groups: Vec<GroupId>,
}

impl Meta {
    pub fn new(
        expires: DateTime<Utc>,
        checksum: Checksum,
        keys: Vec<String>,
        groups: Vec<GroupId>,
    ) -> Self {
        Self {
            expires: truncate_to_seconds(expires),
            checksum,
            keys,
            groups,
        }
    }

    /// Snapshot `cache` with a freshness window of `ttl` starting at `now`
    pub fn from_request_cache(cache: &RequestCache, ttl: Duration, now: DateTime<Utc>) -> Self {
        let expires = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self::new(
            expires,
            cache.fingerprint(),
            cache.single_keys(),
            cache.depended_groups().keys().cloned().collect(),
        )
    }

    /// True once `now` has reached the expiry instant
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    pub fn matches_checksum(&self, checksum: &Checksum) -> bool {
        self.checksum == *checksum
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.expires
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// Single keys, in the order they were first set
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}

fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(instant.timestamp(), 0)
        .single()
        .unwrap_or(instant)
}
