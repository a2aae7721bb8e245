//! Batches of translations rendered one by one

use crate::processor::{Context, ProcessorRegistry};
use crate::undefined::UndefinedStrings;
use lexis_core::{Result, Translation};

/// A key requested as part of a batch, with the context it is rendered with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionKey {
    pub key: String,
    pub context: Context,
}

impl SectionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            context: Context::new(),
        }
    }

    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(name.into(), value.into());
        self
    }
}

impl From<&str> for SectionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SectionKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl<K: Into<String>> From<(K, Context)> for SectionKey {
    fn from((key, context): (K, Context)) -> Self {
        Self {
            key: key.into(),
            context,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SectionItem {
    pub(crate) key: String,
    pub(crate) context: Context,
    pub(crate) translation: Option<Translation>,
}

/// Translations resolved together, rendered in request order.
///
/// Each [`TranslationSection::get`] renders the next item with its own
/// context merged with the call's context; call values win. Items that could
/// not be resolved render as `None` and are recorded as undefined.
pub struct TranslationSection<'a> {
    items: Vec<SectionItem>,
    position: usize,
    registry: &'a ProcessorRegistry,
    undefined: &'a mut UndefinedStrings,
}

impl<'a> TranslationSection<'a> {
    pub(crate) fn new(
        items: Vec<SectionItem>,
        registry: &'a ProcessorRegistry,
        undefined: &'a mut UndefinedStrings,
    ) -> Self {
        Self {
            items,
            position: 0,
            registry,
            undefined,
        }
    }

    /// Render the next item; `Ok(None)` once the section is exhausted
    pub fn get(&mut self, context: &Context) -> Result<Option<String>> {
        let Some(item) = self.items.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;

        let mut merged = item.context.clone();
        merged.extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));

        match &item.translation {
            Some(translation) => self.registry.apply(translation, &merged).map(Some),
            None => {
                self.undefined.record(item.key.as_str(), merged);
                Ok(None)
            }
        }
    }

    /// Keys in request order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.key.as_str())
    }

    /// Number of items not yet rendered
    pub fn remaining(&self) -> usize {
        self.items.len() - self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Start rendering from the first item again
    pub fn rewind(&mut self) {
        self.position = 0;
    }
}

impl Iterator for TranslationSection<'_> {
    type Item = Result<Option<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.items.len() {
            return None;
        }
        Some(self.get(&Context::new()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl std::fmt::Debug for TranslationSection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationSection")
            .field("items", &self.items)
            .field("position", &self.position)
            .finish()
    }
}
