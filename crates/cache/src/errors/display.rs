//! Display implementations for cache errors

use super::types::CacheError;
use std::fmt;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path,
                operation,
                source,
                ..
            } => write!(
                f,
                "I/O error during {} on '{}': {}",
                operation,
                path.display(),
                source
            ),
            Self::Serialization {
                key,
                operation,
                source,
                ..
            } => write!(f, "Failed to {operation:?} cache record '{key}': {source}"),
            Self::InvalidCacheName { name, reason, .. } => {
                write!(f, "Invalid cache name '{name}': {reason}")
            }
            Self::InvalidGroup { group, reason, .. } => {
                write!(f, "Invalid translation group '{group}': {reason}")
            }
            Self::StoreUnavailable { reason, .. } => {
                write!(f, "Translation cache store unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
