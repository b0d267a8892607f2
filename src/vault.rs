//! Local history of produced crumb files.
//!
//! The vault is one JSON array stored under a single key, newest first and
//! capped at [`VAULT_CAPACITY`] entries. Every save or delete rewrites the
//! whole blob; two writers racing on the same store can lose an update.

use chrono::{DateTime, Local, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};
use tracing::{debug, warn};

use crate::crumb::{ConfidenceData, CrumbResult};
use crate::depth::CompressionDepth;
use crate::errors::VaultError;

/// Store key holding the serialized entry list.
pub const VAULT_KEY: &str = "crumb_vault";

/// Maximum entries kept; older ones are evicted from the tail.
pub const VAULT_CAPACITY: usize = 50;

/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 72;

pub const UNTITLED: &str = "Untitled session";

static MISSION_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##\s*(?:🎯\s*)?MISSION\s*\n+([^\n]+)").unwrap());

static BULLET_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*]\s*").unwrap());

// ── Key-value backends ────────────────────────────────────────────────

/// Minimal byte store the vault persists through.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, VaultError>;
    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), VaultError>;
}

/// In-process store, used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, VaultError> {
        let values = self.values.lock().map_err(|_| VaultError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), VaultError> {
        let mut values = self.values.lock().map_err(|_| VaultError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, VaultError> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(VaultError::ReadFailed { path, source }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), VaultError> {
        let path = self.path_for(key);
        std::fs::create_dir_all(&self.dir).map_err(|source| VaultError::WriteFailed {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, value).map_err(|source| VaultError::WriteFailed { path, source })
    }
}

// ── Entries ───────────────────────────────────────────────────────────

/// A saved crumb file. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub id: String,
    /// Epoch milliseconds
    pub created_at: i64,
    pub title: String,
    pub content: String,
    pub crumb_word_count: usize,
    pub confidence: Option<f64>,
    pub confidence_data: Option<ConfidenceData>,
    pub depth: CompressionDepth,
}

impl VaultEntry {
    /// Suggested file name when exporting the entry as Markdown.
    pub fn download_name(&self) -> String {
        download_file_name(self.created_at)
    }
}

/// Everything about an entry except its identity and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVaultEntry {
    pub title: String,
    pub content: String,
    pub crumb_word_count: usize,
    pub confidence: Option<f64>,
    pub confidence_data: Option<ConfidenceData>,
    pub depth: CompressionDepth,
}

impl NewVaultEntry {
    /// Derive title, word count and confidence from a parsed completion.
    pub fn from_result(result: &CrumbResult, depth: CompressionDepth) -> Self {
        let confidence_data = result.confidence.as_option().cloned();
        Self {
            title: extract_vault_title(&result.document),
            content: result.document.clone(),
            crumb_word_count: result.word_count,
            confidence: confidence_data.as_ref().map(|c| c.confidence),
            confidence_data,
            depth,
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Title for a crumb file.
///
/// First line under the Mission heading (bullet marker removed), else the
/// first non-blank line that is not a heading or italic line, else
/// [`UNTITLED`]. Truncated to [`TITLE_MAX_CHARS`].
pub fn extract_vault_title(content: &str) -> String {
    if let Some(line) = MISSION_LINE_REGEX
        .captures(content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
    {
        let unbulleted = BULLET_PREFIX_REGEX.replace(line, "");
        let title = truncate_chars(&unbulleted, TITLE_MAX_CHARS).trim();
        if !title.is_empty() {
            return title.to_string();
        }
    }

    content
        .lines()
        .find(|l| !l.trim().is_empty() && !l.starts_with('#') && !l.starts_with('*'))
        .map(|l| truncate_chars(l, TITLE_MAX_CHARS).trim().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// `crumb-<epoch-ms>.md`
pub fn download_file_name(created_at_ms: i64) -> String {
    format!("crumb-{}.md", created_at_ms)
}

/// Human-friendly age: `Just now`, `5h ago`, `Yesterday`, or a short date.
pub fn format_age(created_at_ms: i64, now: DateTime<Utc>) -> String {
    let diff_ms = now.timestamp_millis() - created_at_ms;
    let diff_hours = diff_ms as f64 / (1000.0 * 60.0 * 60.0);

    if diff_hours < 1.0 {
        "Just now".to_string()
    } else if diff_hours < 24.0 {
        format!("{}h ago", diff_hours.floor() as i64)
    } else if diff_hours < 48.0 {
        "Yesterday".to_string()
    } else {
        match DateTime::from_timestamp_millis(created_at_ms) {
            Some(at) => at.with_timezone(&Local).format("%b %-d").to_string(),
            None => "Unknown".to_string(),
        }
    }
}

fn generate_id(now_ms: i64) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}", now_ms, &random[..11])
}

// ── Vault ─────────────────────────────────────────────────────────────

/// Bounded, newest-first list of crumb files over a [`KeyValueStore`].
pub struct VaultStore<S> {
    store: S,
}

impl<S: KeyValueStore> VaultStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All entries, newest first. Unreadable or corrupt data reads as empty.
    pub fn list(&self) -> Vec<VaultEntry> {
        let bytes = match self.store.get(VAULT_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read vault, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Vault data is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<VaultEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Prepend a new entry stamped with the current time.
    pub fn save_entry(&self, entry: NewVaultEntry) -> Result<VaultEntry, VaultError> {
        self.save_entry_at(entry, Utc::now().timestamp_millis())
    }

    /// Prepend a new entry stamped `now_ms`, evicting beyond capacity.
    pub fn save_entry_at(&self, entry: NewVaultEntry, now_ms: i64) -> Result<VaultEntry, VaultError> {
        let saved = VaultEntry {
            id: generate_id(now_ms),
            created_at: now_ms,
            title: entry.title,
            content: entry.content,
            crumb_word_count: entry.crumb_word_count,
            confidence: entry.confidence,
            confidence_data: entry.confidence_data,
            depth: entry.depth,
        };

        let mut entries = self.list();
        entries.insert(0, saved.clone());
        if entries.len() > VAULT_CAPACITY {
            let evicted = entries.len() - VAULT_CAPACITY;
            entries.truncate(VAULT_CAPACITY);
            debug!(evicted, "Evicted oldest vault entries");
        }

        self.write(&entries)?;
        debug!(id = %saved.id, title = %saved.title, "Saved vault entry");
        Ok(saved)
    }

    /// Remove an entry. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, VaultError> {
        let mut entries = self.list();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        self.write(&entries)?;
        Ok(removed)
    }

    fn write(&self, entries: &[VaultEntry]) -> Result<(), VaultError> {
        let bytes = serde_json::to_vec(entries).map_err(VaultError::Serialize)?;
        self.store.set(VAULT_KEY, &bytes)
    }
}
