use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{GeminiClient, GeminiSettings};
use crate::credentials::Credentials;
use crate::crumb_config::{CONFIG_FILE_NAME, CrumbToml};
use crate::vault::{FileStore, VaultStore};

/// Runtime configuration for Crumb.
///
/// Bridges the `crumb.toml` file with the environment: file values first,
/// then `CRUMB_*` overrides, then credentials from `GEMINI_API_KEY*`.
#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub vault_dir: PathBuf,
    pub credentials: Credentials,
    /// The underlying file configuration, with env overrides applied
    pub toml: CrumbToml,
}

impl Config {
    /// Load configuration from `config_file`, or from the Crumb home.
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let home = crumb_home()?;
        let config_file = config_file.unwrap_or_else(|| home.join(CONFIG_FILE_NAME));

        let mut toml = CrumbToml::load_or_default(&config_file)?;
        toml.apply_env();

        Ok(Self::from_parts(home, config_file, toml, Credentials::from_env()))
    }

    /// Assemble from already-resolved parts.
    pub fn from_parts(
        home: PathBuf,
        config_file: PathBuf,
        toml: CrumbToml,
        credentials: Credentials,
    ) -> Self {
        let vault_dir = toml
            .vault
            .dir
            .clone()
            .unwrap_or_else(|| home.join("vault"));

        Self {
            home,
            config_file,
            vault_dir,
            credentials,
            toml,
        }
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            base_url: self.toml.gemini.base_url.clone(),
            model: self.toml.gemini.model.clone(),
            timeout: Duration::from_secs(self.toml.gemini.timeout_secs),
        }
    }

    pub fn client(&self) -> Result<GeminiClient> {
        GeminiClient::new(self.gemini_settings(), self.credentials.clone())
    }

    pub fn vault(&self) -> VaultStore<FileStore> {
        VaultStore::new(FileStore::new(&self.vault_dir))
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.home).context("Failed to create crumb home directory")?;
        std::fs::create_dir_all(&self.vault_dir).context("Failed to create vault directory")?;
        Ok(())
    }
}

/// `$CRUMB_HOME`, else `~/.crumb`.
pub fn crumb_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os("CRUMB_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|h| h.join(".crumb"))
        .ok_or_else(|| anyhow!("Could not determine home directory; set CRUMB_HOME"))
}
