//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module          | Commands handled                                   |
//! |-----------------|-----------------------------------------------------|
//! | `compress`      | `Compress`                                         |
//! | `inspect`       | `Inspect`                                          |
//! | `stats`         | `Stats`                                            |
//! | `vault`         | `Vault`                                            |
//! | `serve`         | `Serve`                                            |
//! | `config`        | `Config`                                           |

pub mod compress;
pub mod config;
pub mod inspect;
pub mod serve;
pub mod stats;
pub mod vault;

pub use compress::{CompressArgs, cmd_compress};
pub use config::cmd_config;
pub use inspect::cmd_inspect;
pub use serve::cmd_serve;
pub use stats::cmd_stats;
pub use vault::cmd_vault;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when `path` is absent or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
