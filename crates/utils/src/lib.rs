//! Shared utilities for lexis
//!
//! File-system helpers and process setup used by the cache and the CLI.

pub mod atomic_file;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use xdg::*;
