//! Saved crumb files: `crumb vault`.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use console::style;

use crumb::config::Config;
use crumb::vault::format_age;

use super::super::{Cli, VaultCommands};

pub fn cmd_vault(cli: &Cli, command: VaultCommands) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    let vault = config.vault();

    match command {
        VaultCommands::List => {
            let entries = vault.list();
            if entries.is_empty() {
                println!("Vault is empty.");
                return Ok(());
            }

            let now = Utc::now();
            println!();
            println!("{}", style(format!("Vault ({} entries)", entries.len())).bold().cyan());
            println!();
            for entry in &entries {
                let confidence = entry
                    .confidence
                    .map(|c| format!("{:.0}%", c))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "  {}  {:<10} {:<8} {:>4}  {}",
                    style(&entry.id).dim(),
                    format_age(entry.created_at, now),
                    entry.depth,
                    confidence,
                    entry.title
                );
            }
            println!();
        }
        VaultCommands::Show { id } => {
            let Some(entry) = vault.get(&id) else {
                bail!("No vault entry with id {}", id);
            };
            println!("{}", entry.content);
        }
        VaultCommands::Delete { id } => {
            if vault.delete(&id)? {
                println!("Deleted {}", id);
            } else {
                bail!("No vault entry with id {}", id);
            }
        }
        VaultCommands::Export { id, dir } => {
            let Some(entry) = vault.get(&id) else {
                bail!("No vault entry with id {}", id);
            };
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir().context("Failed to get current directory")?,
            };
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            let path = dir.join(entry.download_name());
            std::fs::write(&path, &entry.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}
