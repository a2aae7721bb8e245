//! Providers backed by translation files on disk

use super::{ArrayProvider, Provider};
use indexmap::IndexMap;
use lexis_core::{Error, Language, Result, Translation};
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Decodes one translation file into `key -> text` pairs
pub trait ConfigFileConverter: Send + Sync {
    fn convert(&self, path: &Path) -> Result<IndexMap<String, String>>;
}

/// Flat JSON objects: `{"greeting": "Hello"}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverter;

impl ConfigFileConverter for JsonConverter {
    fn convert(&self, path: &Path) -> Result<IndexMap<String, String>> {
        let content = read(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::json(format!("Failed to parse {}", path.display()), e))
    }
}

/// Flat YAML mappings: `greeting: Hello`
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConverter;

impl ConfigFileConverter for YamlConverter {
    fn convert(&self, path: &Path) -> Result<IndexMap<String, String>> {
        let content = read(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::configuration(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_system(path, "read translation file", e))
}

/// Reads `<name>.<language>.<extension>` files from a directory.
///
/// The directory is scanned once, on the first lookup. Files whose extension
/// has no converter are ignored; files that fail to decode are skipped with
/// a warning. When several files define the same key for a language, the
/// file that sorts last wins.
pub struct ConfigFileProvider {
    dir: PathBuf,
    converters: IndexMap<String, Box<dyn ConfigFileConverter>>,
    loaded: OnceCell<ArrayProvider>,
}

impl ConfigFileProvider {
    /// Provider over `dir` with converters for `json`, `yml` and `yaml`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            converters: IndexMap::new(),
            loaded: OnceCell::new(),
        }
        .with_converter("json", JsonConverter)
        .with_converter("yml", YamlConverter)
        .with_converter("yaml", YamlConverter)
    }

    /// Use `converter` for files ending in `.<extension>`
    #[must_use]
    pub fn with_converter(
        mut self,
        extension: impl Into<String>,
        converter: impl ConfigFileConverter + 'static,
    ) -> Self {
        self.converters
            .insert(extension.into().to_lowercase(), Box::new(converter));
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load(&self) -> ArrayProvider {
        let mut provider = ArrayProvider::new();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Cannot read translation directory"
                );
                return provider;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        for path in files {
            let Some((language, extension)) = split_file_name(&path) else {
                continue;
            };
            let Some(converter) = self.converters.get(&extension) else {
                continue;
            };
            let language = match Language::parse(&language) {
                Ok(language) => language,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping translation file");
                    continue;
                }
            };

            match converter.convert(&path) {
                Ok(entries) => {
                    tracing::debug!(
                        path = %path.display(),
                        language = %language,
                        entries = entries.len(),
                        "Loaded translation file"
                    );
                    provider.set(&language, entries);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping translation file");
                }
            }
        }

        provider
    }
}

impl Provider for ConfigFileProvider {
    fn translations(&self, language: &Language, keys: &[String]) -> Vec<Translation> {
        self.loaded
            .get_or_init(|| self.load())
            .translations(language, keys)
    }
}

impl std::fmt::Debug for ConfigFileProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFileProvider")
            .field("dir", &self.dir)
            .field("converters", &self.converters.keys().collect::<Vec<_>>())
            .field("loaded", &self.loaded.get().is_some())
            .finish()
    }
}

/// `messages.en-us.json` -> (`en-us`, `json`); `de.yml` -> (`de`, `yml`)
fn split_file_name(path: &Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.rsplit('.');
    let extension = parts.next()?.to_lowercase();
    let language = parts.next()?.to_string();
    Some((language, extension))
}
