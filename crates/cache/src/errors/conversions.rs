//! Constructors that pick a recovery hint

use super::types::{CacheError, RecoveryHint};
use std::path::PathBuf;
use std::time::Duration;

impl CacheError {
    /// Wrap an I/O failure on `path`, choosing a recovery hint from its kind
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let path = path.into();
        let recovery_hint = match source.kind() {
            ErrorKind::PermissionDenied => RecoveryHint::CheckPermissions { path: path.clone() },
            ErrorKind::NotFound => RecoveryHint::Recreate,
            ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
                RecoveryHint::Retry {
                    after: Duration::from_millis(10),
                }
            }
            _ => RecoveryHint::UseFallback,
        };

        Self::Io {
            path,
            operation,
            source,
            recovery_hint,
        }
    }
}
