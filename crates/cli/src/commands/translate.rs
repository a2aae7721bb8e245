use super::CacheSettings;
use clap::Args;
use eyre::WrapErr;
use lexis_core::Language;
use lexis_translator::{ConfigFileProvider, Context, Translator, TranslatorConfig};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Keys to resolve; several keys are resolved together as one batch
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Directory holding `<name>.<language>.json|yml|yaml` files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Preferred language, best first (repeatable)
    #[arg(short, long = "lang", value_name = "TAG")]
    pub languages: Vec<String>,

    /// Preferences as an HTTP Accept-Language header, used when no --lang is given
    #[arg(long, value_name = "HEADER")]
    pub accept_language: Option<String>,

    /// Language tried after every preference
    #[arg(long, value_name = "TAG")]
    pub fallback: Option<String>,

    /// Language tried before the preferences for this lookup only
    #[arg(long = "in", value_name = "TAG")]
    pub language: Option<String>,

    /// Placeholder value as name=value (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Attach the named persistent cache
    #[arg(long, value_name = "NAME")]
    pub cache_name: Option<String>,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

impl TranslateArgs {
    fn translator_config(&self, settings: &CacheSettings) -> TranslatorConfig {
        let mut config = TranslatorConfig::new();
        if !self.languages.is_empty() {
            config = config.with_preferences(self.languages.iter().cloned());
        } else if let Some(header) = &self.accept_language {
            config = config.with_accept_language(header);
        }
        if let Some(fallback) = &self.fallback {
            config = config.with_fallback(fallback.as_str());
        }
        if self.cache_name.is_some() {
            config = config.with_cache(settings.config());
        }
        config
    }

    pub fn execute(self, settings: &CacheSettings, out: &mut impl Write) -> eyre::Result<()> {
        let mut translator = Translator::new(self.translator_config(settings))
            .wrap_err("Invalid translator configuration")?;
        translator.add_provider(ConfigFileProvider::new(&self.dir));

        if let Some(name) = &self.cache_name {
            if let Some(report) = translator.load_cache(name) {
                tracing::info!(
                    cache_name = %name,
                    state = %report.state,
                    singles = report.singles,
                    groups = report.groups,
                    "Loaded translation cache"
                );
            }
        }

        let language = self
            .language
            .as_deref()
            .map(Language::parse)
            .transpose()
            .wrap_err("Invalid --in language")?;
        let context: Context = self.vars.iter().cloned().collect();

        if let [key] = self.keys.as_slice() {
            let rendered = translator.single(key, &context, language.as_ref())?;
            writeln!(out, "{}", rendered.unwrap_or_default())?;
        } else {
            let section =
                translator.multiple(self.keys.iter().map(String::as_str), language.as_ref())?;
            let keys: Vec<String> = section.keys().map(str::to_string).collect();
            let rendered = collect_rendered(section, &context)?;
            for (key, text) in keys.iter().zip(rendered) {
                writeln!(out, "{key}\t{}", text.unwrap_or_default())?;
            }
        }

        for key in translator.undefined().keys() {
            tracing::warn!(key = %key, "Translation key is not defined in any language");
        }

        let outcome = translator.finish().wrap_err("Failed to save translation cache")?;
        tracing::debug!(?outcome, "Translation session finished");
        Ok(())
    }
}

fn collect_rendered(
    mut section: lexis_translator::TranslationSection<'_>,
    context: &Context,
) -> lexis_core::Result<Vec<Option<String>>> {
    let mut rendered = Vec::with_capacity(section.len());
    while section.remaining() > 0 {
        rendered.push(section.get(context)?);
    }
    Ok(rendered)
}
