//! Keys that no provider could resolve

use crate::processor::Context;
use indexmap::IndexMap;

/// Keys requested during a session that resolved to nothing, with the
/// context they were last requested with
#[derive(Debug, Clone, Default)]
pub struct UndefinedStrings {
    entries: IndexMap<String, Context>,
}

impl UndefinedStrings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, context: Context) {
        let key = key.into();
        tracing::debug!(key = %key, "Translation key is undefined");
        self.entries.insert(key, context);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Context of the last request for `key`
    pub fn context(&self, key: &str) -> Option<&Context> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Context> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a UndefinedStrings {
    type Item = (&'a String, &'a Context);
    type IntoIter = indexmap::map::Iter<'a, String, Context>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
