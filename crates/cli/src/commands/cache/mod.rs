use super::CacheSettings;
use chrono::{SecondsFormat, Utc};
use clap::Subcommand;
use lexis_cache::{FileStore, Meta, TranslationStore};
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Print the record of a named cache
    Show {
        /// Cache name
        name: String,
    },
    /// Remove the record and single-key blobs of a named cache
    Clear {
        /// Cache name
        name: String,
    },
    /// Remove group blobs that no cache record lists
    Prune,
}

impl CacheCommands {
    pub fn execute(self, settings: &CacheSettings, out: &mut impl Write) -> eyre::Result<()> {
        let config = settings.config();
        let store = FileStore::new(config.base_dir);

        match self {
            CacheCommands::Show { name } => {
                let Some(meta) = store.load_meta(&name)? else {
                    writeln!(out, "No cache record for '{name}'")?;
                    return Ok(());
                };

                writeln!(out, "Cache:    {name}")?;
                writeln!(out, "Expires:  {}", format_expiry(&meta))?;
                writeln!(out, "Checksum: {}", meta.checksum())?;
                writeln!(out, "Keys ({}):", meta.keys().len())?;
                for key in meta.keys() {
                    writeln!(out, "  {key}")?;
                }
                writeln!(out, "Groups ({}):", meta.groups().len())?;
                for group in meta.groups() {
                    writeln!(out, "  {group}")?;
                }
                Ok(())
            }
            CacheCommands::Clear { name } => {
                if store.clear(&name)? {
                    tracing::info!(cache_name = %name, "Cache cleared");
                    writeln!(out, "✓ Cleared cache '{name}'")?;
                } else {
                    writeln!(out, "No cache record for '{name}'")?;
                }
                Ok(())
            }
            CacheCommands::Prune => {
                let removed = store.prune_groups()?;
                tracing::info!(removed, "Pruned translation groups");
                writeln!(out, "✓ Removed {removed} unreferenced group(s)")?;
                Ok(())
            }
        }
    }
}

fn format_expiry(meta: &Meta) -> String {
    let expires = meta.expires().to_rfc3339_opts(SecondsFormat::Secs, true);
    if meta.is_expired(Utc::now()) {
        format!("{expires} (expired)")
    } else {
        expires
    }
}
