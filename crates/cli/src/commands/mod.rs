use clap::Subcommand;
use lexis_cache::{CacheConfig, CacheMode};
use std::path::PathBuf;

pub mod cache;
pub mod translate;

use self::cache::CacheCommands;
use self::translate::TranslateArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve translation keys from a directory of translation files
    #[command(visible_alias = "t")]
    Translate(TranslateArgs),

    /// Inspect or remove persistent translation caches
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

/// Cache settings from global flags, layered over the environment
#[derive(Debug, Clone, Default)]
pub struct CacheSettings {
    pub mode: Option<CacheMode>,
    pub dir: Option<PathBuf>,
}

impl CacheSettings {
    pub fn config(&self) -> CacheConfig {
        let mut config = CacheConfig::from_env();
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(dir) = &self.dir {
            config.base_dir = dir.clone();
        }
        config
    }
}

impl Commands {
    pub fn execute(self, settings: &CacheSettings) -> eyre::Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        match self {
            Commands::Translate(args) => args.execute(settings, &mut out),
            Commands::Cache { command } => command.execute(settings, &mut out),
        }
    }
}
