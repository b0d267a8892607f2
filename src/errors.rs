//! Typed error hierarchy for Crumb.
//!
//! Two top-level enums cover the two subsystems:
//! - `CompressError`: request validation, credentials, the completion call
//! - `VaultError`: reading and writing the persisted vault blob
//!
//! A missing or malformed confidence block is deliberately not an error; see
//! [`crate::crumb::Extracted`].

use thiserror::Error;

/// Errors from the compression pipeline.
#[derive(Debug, Error)]
pub enum CompressError {
    /// Empty or oversized conversation, rejected at the inbound boundary.
    #[error("{0}")]
    Validation(String),

    /// The requested credential slot has no configured API key.
    #[error("No API key configured for server {index}")]
    Configuration { index: usize },

    /// Non-success response (or transport failure) from the completion service.
    #[error("{0}")]
    Upstream(String),

    /// Success status but no candidate text in the payload.
    #[error("No response from Gemini")]
    EmptyResponse,
}

impl CompressError {
    /// Whether the boundary should answer with a client error instead of 500.
    pub fn is_validation(&self) -> bool {
        matches!(self, CompressError::Validation(_))
    }
}

/// Errors from the vault persistence layer.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Failed to read vault store at {path}: {source}")]
    ReadFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write vault store at {path}: {source}")]
    WriteFailed {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize vault entries: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Vault store lock poisoned")]
    LockPoisoned,
}
