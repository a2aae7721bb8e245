//! Translation cache for lexis
//!
//! Two tiers work together:
//! - [`RequestCache`]: the in-process cache of one resolution session, with
//!   separate namespaces for single-key lookups and batch (group) lookups
//! - [`TranslationStore`]: durable storage, by default [`FileStore`]
//!
//! [`CacheEngine`] moves data between them. Loading hydrates a request cache
//! from a [`Meta`] record by walking the caller's language preferences;
//! saving compares the request cache's fingerprint against the record and
//! writes only when the key set changed. [`CacheSession`] ties both to a
//! scope so the save happens exactly once.

pub mod config;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod meta;
pub mod mode;
pub mod request;
pub mod session;
pub mod store;

pub use config::{CacheConfig, CacheConfigBuilder};
pub use engine::{CacheEngine, LoadReport, LoadState, SaveOutcome};
pub use errors::{CacheError, Error, RecoveryHint, Result};
pub use hashing::{Checksum, GroupId};
pub use meta::Meta;
pub use mode::{get_cache_mode, CacheMode};
pub use request::{Lookup, RequestCache, TranslationMap};
pub use session::CacheSession;
pub use store::{FileStore, MemoryStore, StoreAccess, TranslationStore};
