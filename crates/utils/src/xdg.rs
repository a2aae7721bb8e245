use lexis_core::{DEFAULT_CACHE_DIR_NAME, LEXIS_CACHE_DIR_VAR};
use std::env;
use std::path::PathBuf;

/// XDG Base Directory paths for lexis
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CACHE_HOME/lexis or fallback
    pub fn cache_dir() -> PathBuf {
        env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".cache"))
                    .unwrap_or_else(|| PathBuf::from(".cache"))
            })
            .join(DEFAULT_CACHE_DIR_NAME)
    }

    /// Translation cache root: `LEXIS_CACHE_DIR` when set, otherwise [`XdgPaths::cache_dir`]
    pub fn translation_cache_dir() -> PathBuf {
        match env::var(LEXIS_CACHE_DIR_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => Self::cache_dir(),
        }
    }
}
