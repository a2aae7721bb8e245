//! Typed identifiers for translation post-processors

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;

/// Name of a post-processing step attached to a [`Translation`](crate::Translation).
///
/// Identifiers are lower-case ASCII words (`a-z`, `0-9`, `_`, `-`) so they
/// can be stored in cache blobs and matched against a processor registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProcessorId(String);

impl ProcessorId {
    /// Identifier of the built-in `{placeholder}` substitution processor
    pub const REPLACE: &'static str = "replace";

    /// Create a new ProcessorId with validation
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::invalid_processor(id, "identifier cannot be empty"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(Error::invalid_processor(
                id,
                "identifier must contain only lower-case ASCII letters, digits, '_' and '-'",
            ));
        }
        Ok(Self(id))
    }

    /// The built-in replace processor
    pub fn replace() -> Self {
        Self(Self::REPLACE.to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ProcessorId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for ProcessorId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProcessorId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<ProcessorId> for String {
    fn from(id: ProcessorId) -> Self {
        id.0
    }
}
