//! Content checksums for group identifiers and cache fingerprints
//!
//! Both are SHA-256 digests rendered as lower-case hex. Key sets are sorted
//! and deduplicated before hashing so the result depends only on which keys
//! are present, never on the order they were requested or inserted in.
//! Every item is length-prefixed, so `["a.b"]` and `["a", "b"]` never collide
//! through concatenation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};

const CHECKSUM_HEX_LEN: usize = 64;

/// A 256-bit content checksum in hex form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

/// Identifier of a batch of keys resolved together: the checksum of its key set
pub type GroupId = Checksum;

impl Checksum {
    /// Checksum of a set of keys, independent of order and duplicates
    pub fn of_key_set<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<S> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        keys.dedup_by(|a, b| a.as_ref() == b.as_ref());
        Self::of_sequence(keys.iter().map(|k| k.as_ref()))
    }

    /// Fingerprint of a whole request cache: the single-key set and the group set
    pub fn fingerprint<'a, K, G>(single_keys: K, groups: G) -> Self
    where
        K: IntoIterator<Item = &'a str>,
        G: IntoIterator<Item = &'a GroupId>,
    {
        let singles = Self::of_key_set(single_keys);
        let groups = Self::of_key_set(groups.into_iter().map(Checksum::as_str));
        Self::of_sequence([singles.as_str(), groups.as_str()])
    }

    /// Parse a previously rendered checksum
    pub fn from_hex(value: &str) -> Option<Self> {
        let valid = value.len() == CHECKSUM_HEX_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }

    fn of_sequence<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let mut hasher = Sha256::new();
        for item in items {
            let bytes = item.as_bytes();
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        Self(hex::encode(hasher.finalize()))
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Checksum {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("'{value}' is not a 64-digit hex checksum"))
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}
