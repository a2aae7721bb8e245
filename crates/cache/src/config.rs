//! Cache configuration passed explicitly to the engine
use crate::mode::{get_cache_mode, CacheMode};
use lexis_core::{DEFAULT_CACHE_TTL_SECS, LEXIS_CACHE_TTL_VAR};
use lexis_utils::xdg::XdgPaths;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a translation cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Root directory of the file store
    pub base_dir: PathBuf,
    /// How long a saved record stays fresh
    pub ttl: Duration,
    /// Whether loads and saves touch storage at all
    pub mode: CacheMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: XdgPaths::cache_dir(),
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            mode: CacheMode::ReadWrite,
        }
    }
}

impl CacheConfig {
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::new()
    }

    /// Defaults overlaid with `LEXIS_CACHE`, `LEXIS_CACHE_DIR` and `LEXIS_CACHE_TTL`
    pub fn from_env() -> Self {
        let ttl = match std::env::var(LEXIS_CACHE_TTL_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        "Ignoring non-numeric {}, using default TTL",
                        LEXIS_CACHE_TTL_VAR
                    );
                    Duration::from_secs(DEFAULT_CACHE_TTL_SECS)
                }
            },
            Err(_) => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        };

        Self {
            base_dir: XdgPaths::translation_cache_dir(),
            ttl,
            mode: get_cache_mode(),
        }
    }
}

/// Builder for cache configuration
#[derive(Debug, Clone, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.config.base_dir = base_dir.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = ttl;
        self
    }

    pub fn with_mode(mut self, mode: CacheMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn build(self) -> CacheConfig {
        self.config
    }
}
