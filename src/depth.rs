//! Compression depth selection.

use serde::{Deserialize, Serialize};

/// How aggressively a conversation is condensed.
///
/// | Depth      | Target size   | Use                                  |
/// |------------|---------------|--------------------------------------|
/// | `Snapshot` | ~500 tokens   | Quick hand-off, brutally concise     |
/// | `Memory`   | ~1000 tokens  | Balanced default                     |
/// | `Full`     | ~3000 tokens  | Rich detail including code and nuance|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionDepth {
    Snapshot,
    #[default]
    Memory,
    Full,
}

impl CompressionDepth {
    pub const ALL: [CompressionDepth; 3] = [
        CompressionDepth::Snapshot,
        CompressionDepth::Memory,
        CompressionDepth::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompressionDepth::Snapshot => "snapshot",
            CompressionDepth::Memory => "memory",
            CompressionDepth::Full => "full",
        }
    }
}

impl std::fmt::Display for CompressionDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CompressionDepth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" => Ok(CompressionDepth::Snapshot),
            "memory" => Ok(CompressionDepth::Memory),
            "full" => Ok(CompressionDepth::Full),
            _ => anyhow::bail!(
                "Invalid depth '{}'. Valid values: snapshot, memory, full",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        assert_eq!(CompressionDepth::default(), CompressionDepth::Memory);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "SNAPSHOT".parse::<CompressionDepth>().unwrap(),
            CompressionDepth::Snapshot
        );
        assert_eq!(
            " Full ".parse::<CompressionDepth>().unwrap(),
            CompressionDepth::Full
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "deep".parse::<CompressionDepth>().unwrap_err();
        assert!(err.to_string().contains("snapshot, memory, full"));
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&CompressionDepth::Snapshot).unwrap();
        assert_eq!(json, "\"snapshot\"");
        let parsed: CompressionDepth = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(parsed, CompressionDepth::Full);
    }
}
