/// Constants used throughout the lexis codebase
// Environment variable names
pub const LEXIS_CACHE_VAR: &str = "LEXIS_CACHE";
pub const LEXIS_CACHE_DIR_VAR: &str = "LEXIS_CACHE_DIR";
pub const LEXIS_CACHE_TTL_VAR: &str = "LEXIS_CACHE_TTL";
pub const LEXIS_LOG_VAR: &str = "LEXIS_LOG";

// Cache defaults
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;
pub const DEFAULT_CACHE_DIR_NAME: &str = "lexis";

// Language used when nothing else is configured
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";
