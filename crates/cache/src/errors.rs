//! Error handling for the translation cache
//!
//! Every failure carries a [`RecoveryHint`] so the host application can
//! decide whether to retry, repair the cache directory, or keep resolving
//! translations without a cache.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
