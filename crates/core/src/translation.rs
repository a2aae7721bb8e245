//! Resolved translation values

use crate::language::Language;
use crate::processor::ProcessorId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{[a-z]+\}").unwrap_or_else(|e| unreachable!("placeholder pattern is valid: {e}"))
});

/// A raw translated string together with the language it was resolved for
/// and the processors that must run before it is shown.
///
/// Providers create translations without knowing which preference they are
/// answering, so the language starts unset and is bound with
/// [`Translation::with_language`] by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    text: String,
    #[serde(default)]
    language: Option<Language>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    processors: Vec<ProcessorId>,
}

impl Translation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            processors: Vec::new(),
        }
    }

    /// Copy of this translation with an extra processor appended
    #[must_use]
    pub fn with_processor(mut self, id: ProcessorId) -> Self {
        self.processors.push(id);
        self
    }

    /// Copy of this translation bound to `language`
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Attach the replace processor when the text carries `{name}` placeholders
    #[must_use]
    pub fn detect_processors(self) -> Self {
        let has_replace = self.processors.iter().any(|p| p.as_str() == ProcessorId::REPLACE);
        if !has_replace && PLACEHOLDER_PATTERN.is_match(&self.text) {
            self.with_processor(ProcessorId::replace())
        } else {
            self
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    pub fn processors(&self) -> &[ProcessorId] {
        &self.processors
    }
}

impl Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
