//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint};

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Io { recovery_hint, .. }
            | Self::Serialization { recovery_hint, .. }
            | Self::InvalidCacheName { recovery_hint, .. }
            | Self::InvalidGroup { recovery_hint, .. }
            | Self::StoreUnavailable { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Storage could not be reached or written; the caller should carry on without a cache
    #[must_use]
    pub const fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::StoreUnavailable { .. })
    }
}
