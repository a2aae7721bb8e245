//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for lexis operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lexis operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    Configuration { message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A language tag that does not match `code[-region]`
    InvalidLanguage { value: String },

    /// A processor identifier that is malformed or not registered
    InvalidProcessor { id: String, reason: String },

    /// A processor failed while transforming a translation
    Processor { id: String, message: String },
}
