//! Post-processing of resolved translations

use indexmap::IndexMap;
use lexis_core::{Error, ProcessorId, Result, Translation};
use std::fmt;

/// Variables available to processors, in the order they were given
pub type Context = IndexMap<String, String>;

/// Transforms the raw text of a translation
pub trait Processor: Send + Sync {
    fn process(&self, text: &str, context: &Context) -> Result<String>;
}

impl<F> Processor for F
where
    F: Fn(&str, &Context) -> Result<String> + Send + Sync,
{
    fn process(&self, text: &str, context: &Context) -> Result<String> {
        self(text, context)
    }
}

/// Substitutes `{name}` placeholders with context values.
///
/// Variables are applied one after another in context order; placeholders
/// without a matching variable are left as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceProcessor;

impl Processor for ReplaceProcessor {
    fn process(&self, text: &str, context: &Context) -> Result<String> {
        let mut result = text.to_string();
        for (name, value) in context {
            result = result.replace(&format!("{{{name}}}"), value);
        }
        Ok(result)
    }
}

/// Processors addressable by id.
///
/// Ids are checked when a processor is registered and when a provider hands
/// back a translation, so an unknown id surfaces at resolution time rather
/// than when the string is finally rendered.
pub struct ProcessorRegistry {
    processors: IndexMap<ProcessorId, Box<dyn Processor>>,
}

impl ProcessorRegistry {
    /// A registry with nothing registered
    pub fn empty() -> Self {
        Self {
            processors: IndexMap::new(),
        }
    }

    /// A registry with the built-in `replace` processor
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .processors
            .insert(ProcessorId::replace(), Box::new(ReplaceProcessor));
        registry
    }

    /// Add a processor; an id can only be registered once
    pub fn register(
        &mut self,
        id: ProcessorId,
        processor: impl Processor + 'static,
    ) -> Result<()> {
        if self.processors.contains_key(&id) {
            return Err(Error::invalid_processor(id.as_str(), "already registered"));
        }
        tracing::debug!(processor = %id, "Registered translation processor");
        self.processors.insert(id, Box::new(processor));
        Ok(())
    }

    pub fn contains(&self, id: &ProcessorId) -> bool {
        self.processors.contains_key(id)
    }

    /// Check that every processor `translation` names is registered
    pub fn validate(&self, translation: &Translation) -> Result<()> {
        match translation.processors().iter().find(|id| !self.contains(id)) {
            Some(id) => Err(Error::invalid_processor(id.as_str(), "not registered")),
            None => Ok(()),
        }
    }

    /// Run the processor chain of `translation` over its text.
    ///
    /// A failing processor is reported as [`Error::Processor`] naming it.
    pub fn apply(&self, translation: &Translation, context: &Context) -> Result<String> {
        let mut text = translation.text().to_string();
        for id in translation.processors() {
            let processor = self
                .processors
                .get(id)
                .ok_or_else(|| Error::invalid_processor(id.as_str(), "not registered"))?;
            text = processor.process(&text, context).map_err(|e| match e {
                e @ Error::Processor { .. } => e,
                other => Error::processor(id.as_str(), other.to_string()),
            })?;
        }
        Ok(text)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ProcessorId> {
        self.processors.keys()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.processors.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(vars: &[(&str, &str)]) -> Context {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_replace_processor() {
        let out = ReplaceProcessor
            .process(
                "Hello {name}, you have {count} messages ({name})",
                &context(&[("name", "Ada"), ("count", "3")]),
            )
            .unwrap();
        assert_eq!(out, "Hello Ada, you have 3 messages (Ada)");

        let untouched = ReplaceProcessor
            .process("Hello {name}", &Context::new())
            .unwrap();
        assert_eq!(untouched, "Hello {name}");
    }

    fn upper(text: &str, _: &Context) -> Result<String> {
        Ok(text.to_uppercase())
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ProcessorRegistry::with_builtins();
        let upper_id = ProcessorId::new("upper").unwrap();

        registry.register(upper_id.clone(), upper).unwrap();
        let again = registry.register(upper_id, ReplaceProcessor);
        assert!(matches!(again, Err(Error::InvalidProcessor { .. })));

        let replace = registry.register(ProcessorId::replace(), ReplaceProcessor);
        assert!(matches!(replace, Err(Error::InvalidProcessor { .. })));
    }

    #[test]
    fn test_apply_runs_chain_in_order() {
        let mut registry = ProcessorRegistry::with_builtins();
        let upper_id = ProcessorId::new("upper").unwrap();
        registry.register(upper_id.clone(), upper).unwrap();

        let translation = Translation::new("hi {name}")
            .with_processor(ProcessorId::replace())
            .with_processor(upper_id);

        let out = registry
            .apply(&translation, &context(&[("name", "bob")]))
            .unwrap();
        assert_eq!(out, "HI BOB");
    }

    #[test]
    fn test_unknown_processor() {
        let registry = ProcessorRegistry::with_builtins();
        let translation =
            Translation::new("x").with_processor(ProcessorId::new("missing").unwrap());

        assert!(matches!(
            registry.validate(&translation),
            Err(Error::InvalidProcessor { .. })
        ));
        assert!(registry.apply(&translation, &Context::new()).is_err());
        assert!(registry.validate(&Translation::new("plain")).is_ok());
    }

    fn reject(_: &str, _: &Context) -> Result<String> {
        Err(Error::configuration("plural rules missing"))
    }

    #[test]
    fn test_processor_failure_names_processor() {
        let mut registry = ProcessorRegistry::empty();
        let id = ProcessorId::new("plural").unwrap();
        registry.register(id.clone(), reject).unwrap();

        let err = registry
            .apply(&Translation::new("x").with_processor(id), &Context::new())
            .unwrap_err();
        match err {
            Error::Processor { id, message } => {
                assert_eq!(id, "plural");
                assert!(message.contains("plural rules missing"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
