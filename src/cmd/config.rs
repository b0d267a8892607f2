//! Configuration view and bootstrap: `crumb config`.

use anyhow::Result;

use crumb::config::Config;
use crumb::credentials::KEY_ENV_VARS;
use crumb::crumb_config::CrumbToml;

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    let config = Config::load(cli.config.clone())?;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Crumb Configuration");
            println!("===================");
            println!();

            if config.config_file.exists() {
                println!("Config file: {}", config.config_file.display());
            } else {
                println!("No crumb.toml found at {}", config.config_file.display());
                println!("Using defaults. Run 'crumb config init' to create one.");
            }
            println!();

            let toml = &config.toml;
            println!("[gemini]");
            println!("  base_url = \"{}\"", toml.gemini.base_url);
            println!("  model = \"{}\"", toml.gemini.model);
            println!("  timeout_secs = {}", toml.gemini.timeout_secs);
            println!();
            println!("[defaults]");
            println!("  depth = \"{}\"", toml.defaults.depth);
            println!("  server = {}", toml.defaults.server);
            println!();
            println!("[vault]");
            let vault = config.vault();
            println!("  dir = \"{}\"", vault.store().dir().display());
            println!("  # {} saved entries", vault.list().len());
            println!();
            println!("[server]");
            println!("  host = \"{}\"", toml.server.host);
            println!("  port = {}", toml.server.port);
            println!();

            println!("API keys:");
            let configured = config.credentials.configured_slots();
            for (i, var) in KEY_ENV_VARS.iter().enumerate() {
                let status = if configured.contains(&(i + 1)) {
                    "set"
                } else {
                    "not set"
                };
                println!("  server {} ({}) {}", i + 1, var, status);
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config.config_file.exists() {
                println!("crumb.toml already exists at {}", config.config_file.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            CrumbToml::default().save(&config.config_file)?;
            config.ensure_directories()?;

            println!("Created crumb.toml at {}", config.config_file.display());
            println!();
            println!("You can now customize:");
            println!("  - [gemini] model, base_url, timeout_secs");
            println!("  - [defaults] depth, server");
            println!("  - [vault] dir");
            println!("  - [server] host, port");
            println!();
            println!("API keys are read from GEMINI_API_KEY, GEMINI_API_KEY_2 and GEMINI_API_KEY_3.");
            println!();
        }
    }

    Ok(())
}
