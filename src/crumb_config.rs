//! Configuration file for Crumb.
//!
//! Read from `crumb.toml` in the Crumb home directory. Every field has a
//! default, so a missing file or a partial one is fine.
//!
//! # Configuration File Format
//!
//! ```toml
//! [gemini]
//! base_url = "https://generativelanguage.googleapis.com"
//! model = "gemini-1.5-flash"
//! timeout_secs = 120
//!
//! [defaults]
//! depth = "memory"
//! server = 1
//!
//! [vault]
//! dir = "/home/me/.crumb/vault"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3142
//! ```
//!
//! API keys are never read from this file; see [`crate::credentials`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::depth::CompressionDepth;
use crate::orchestrator::DEFAULT_SERVER;

pub const CONFIG_FILE_NAME: &str = "crumb.toml";

/// Completion backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Defaults applied when a command does not specify them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsSection {
    #[serde(default)]
    pub depth: CompressionDepth,
    #[serde(default = "default_server")]
    pub server: usize,
}

fn default_server() -> usize {
    DEFAULT_SERVER
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            depth: CompressionDepth::default(),
            server: default_server(),
        }
    }
}

/// Vault location. Capacity is fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaultSection {
    /// Directory holding the vault file (default: `<crumb home>/vault`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Inbound HTTP boundary settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3142
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// The complete crumb.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrumbToml {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub server: ServerSection,
}

impl CrumbToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse crumb.toml")
    }

    /// Load from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize crumb.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Apply `CRUMB_GEMINI_BASE_URL` / `CRUMB_GEMINI_MODEL` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("CRUMB_GEMINI_BASE_URL").ok(),
            std::env::var("CRUMB_GEMINI_MODEL").ok(),
        );
    }

    fn apply_overrides(&mut self, base_url: Option<String>, model: Option<String>) {
        if let Some(url) = base_url.filter(|v| !v.trim().is_empty()) {
            self.gemini.base_url = url;
        }
        if let Some(model) = model.filter(|v| !v.trim().is_empty()) {
            self.gemini.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CrumbToml::parse("").unwrap();
        assert_eq!(config, CrumbToml::default());
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.defaults.depth, CompressionDepth::Memory);
        assert_eq!(config.defaults.server, 1);
        assert_eq!(config.server.port, 3142);
        assert!(config.vault.dir.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = CrumbToml::parse(
            r#"
            [gemini]
            model = "gemini-2.0-flash"

            [defaults]
            depth = "full"
            "#,
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout_secs, 120);
        assert_eq!(config.defaults.depth, CompressionDepth::Full);
        assert_eq!(config.defaults.server, 1);
    }

    #[test]
    fn test_invalid_depth_is_an_error() {
        let err = CrumbToml::parse("[defaults]\ndepth = \"huge\"").unwrap_err();
        assert!(err.to_string().contains("crumb.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = CrumbToml::default();
        config.server.port = 9999;
        config.vault.dir = Some(dir.path().join("v"));
        config.save(&path).unwrap();

        let loaded = CrumbToml::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = CrumbToml::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, CrumbToml::default());
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = CrumbToml::default();
        config.apply_overrides(Some("http://localhost:8080".into()), Some("  ".into()));
        assert_eq!(config.gemini.base_url, "http://localhost:8080");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }
}
