//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::InvalidLanguage { value } => {
                write!(f, "invalid language tag '{value}': expected code or code-region")
            }
            Error::InvalidProcessor { id, reason } => {
                write!(f, "invalid translation processor '{id}': {reason}")
            }
            Error::Processor { id, message } => {
                write!(f, "translation processor '{id}' failed: {message}")
            }
        }
    }
}
