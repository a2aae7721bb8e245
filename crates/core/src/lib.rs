//! Core domain types, errors, and constants for `lexis`.
//!
//! This crate holds the value types every other lexis crate agrees on:
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias.
//! - **`language`**: the `code-region` language tag used as a storage key and
//!   as a fallback-order input.
//! - **`translation`**: the resolved, not yet processed translation string.
//! - **`processor`**: typed identifiers naming post-processing steps.
//! - **`constants`**: environment variable names and defaults.

pub mod constants;
pub mod errors;
pub mod language;
pub mod processor;
pub mod translation;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    language::Language,
    processor::ProcessorId,
    translation::Translation,
};
