//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a JSON error with a message describing what was being decoded
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid language error
    #[must_use]
    pub fn invalid_language(value: impl Into<String>) -> Self {
        Error::InvalidLanguage {
            value: value.into(),
        }
    }

    /// Create an invalid processor error
    #[must_use]
    pub fn invalid_processor(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidProcessor {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a processor failure
    #[must_use]
    pub fn processor(id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Processor {
            id: id.into(),
            message: message.into(),
        }
    }
}
