//! Translation resolution for `lexis`.
//!
//! A [`Translator`] looks keys up across an ordered list of
//! [`Provider`]s for each preferred language, post-processes the raw text
//! through a [`ProcessorRegistry`] and keeps what it resolved in a
//! [`lexis_cache::RequestCache`]. Attaching a named persistent cache with
//! [`Translator::load_cache`] lets the next session skip the providers for
//! keys it already resolved.
//!
//! ```no_run
//! use lexis_translator::{ConfigFileProvider, Context, Translator, TranslatorConfig};
//!
//! # fn main() -> lexis_core::Result<()> {
//! let config = TranslatorConfig::new().with_accept_language("de-AT,de;q=0.9,en;q=0.5");
//! let mut translator = Translator::new(config)?;
//! translator.add_provider(ConfigFileProvider::new("translations"));
//!
//! let mut context = Context::new();
//! context.insert("name".to_string(), "Ada".to_string());
//! let greeting = translator.single("greeting", &context, None)?;
//! # let _ = greeting;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod preferences;
pub mod processor;
pub mod provider;
pub mod section;
pub mod translator;
pub mod undefined;

pub use config::TranslatorConfig;
pub use preferences::{expand_preferences, parse_accept_language};
pub use processor::{Context, Processor, ProcessorRegistry, ReplaceProcessor};
pub use provider::{
    ArrayProvider, ConfigFileConverter, ConfigFileProvider, JsonConverter, Provider, ProviderChain,
    YamlConverter, DEFAULT_PRIORITY,
};
pub use section::{SectionKey, TranslationSection};
pub use translator::Translator;
pub use undefined::UndefinedStrings;
