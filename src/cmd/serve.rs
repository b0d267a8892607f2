//! HTTP compression endpoint: `crumb serve`.

use anyhow::Result;
use std::sync::Arc;

use crumb::config::Config;
use crumb::server::{ServerConfig, start_server};

use super::super::Cli;

pub async fn cmd_serve(cli: &Cli, port: Option<u16>, dev: bool) -> Result<()> {
    let config = Config::load(cli.config.clone())?;

    if !config.credentials.has_any() {
        eprintln!(
            "{} no GEMINI_API_KEY is set; every request will fail until one is configured",
            console::style("Warning:").yellow().bold()
        );
    }

    let host = if dev {
        "0.0.0.0".to_string()
    } else {
        config.toml.server.host.clone()
    };

    start_server(
        ServerConfig {
            host,
            port: port.unwrap_or(config.toml.server.port),
            dev_mode: dev,
            default_depth: config.toml.defaults.depth,
            default_server: config.toml.defaults.server,
        },
        Arc::new(config.client()?),
    )
    .await
}
