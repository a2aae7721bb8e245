use clap::Parser;
use lexis::{CacheSettings, Commands};
use lexis_cache::CacheMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexis")]
#[command(about = "Resolve translation keys with a persistent translation cache", long_about = None)]
#[command(version)]
struct Cli {
    /// Cache mode (off, read, read-write, write)
    #[arg(long, global = true, value_parser = ["off", "read", "read-write", "write"])]
    cache: Option<String>,

    /// Root directory of the translation cache
    #[arg(long, global = true, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    lexis_utils::tracing::init().map_err(|e| eyre::eyre!(e))?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = CacheSettings {
        mode: cli.cache.as_deref().map(CacheMode::from),
        dir: cli.cache_dir,
    };

    cli.command.execute(&settings)
}
