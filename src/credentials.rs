//! API key slots selected by the caller-facing "server" number.

use crate::errors::CompressError;

/// Environment variables holding the keys for servers 1, 2 and 3.
pub const KEY_ENV_VARS: [&str; 3] = ["GEMINI_API_KEY", "GEMINI_API_KEY_2", "GEMINI_API_KEY_3"];

/// Ordered credential slots. Slot `n` (1-based) is "server n".
#[derive(Clone, Default)]
pub struct Credentials {
    slots: Vec<Option<String>>,
}

// Keys must never end up in logs or panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("configured", &self.configured_slots())
            .finish()
    }
}

impl Credentials {
    /// Build from explicit slots. Blank keys count as not configured.
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let slots = slots
            .into_iter()
            .map(|slot| slot.map(Into::into).filter(|k: &String| !k.trim().is_empty()))
            .collect();
        Self { slots }
    }

    /// Read [`KEY_ENV_VARS`] from the process environment.
    pub fn from_env() -> Self {
        Self::new(KEY_ENV_VARS.iter().map(|var| std::env::var(var).ok()))
    }

    /// Key for a 1-based server index.
    ///
    /// Never substitutes another slot: an unconfigured index is an error.
    pub fn resolve(&self, index: usize) -> Result<&str, CompressError> {
        index
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .and_then(|slot| slot.as_deref())
            .ok_or(CompressError::Configuration { index })
    }

    /// 1-based indices that have a key.
    pub fn configured_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn has_any(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_one_based() {
        let creds = Credentials::new([Some("k1"), Some("k2"), None]);
        assert_eq!(creds.resolve(1).unwrap(), "k1");
        assert_eq!(creds.resolve(2).unwrap(), "k2");
    }

    #[test]
    fn test_resolve_missing_slot_does_not_fall_back() {
        let creds = Credentials::new([Some("k1"), None, None]);
        match creds.resolve(3) {
            Err(CompressError::Configuration { index }) => assert_eq!(index, 3),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_zero_and_out_of_range() {
        let creds = Credentials::new([Some("k1")]);
        assert!(matches!(
            creds.resolve(0),
            Err(CompressError::Configuration { index: 0 })
        ));
        assert!(matches!(
            creds.resolve(7),
            Err(CompressError::Configuration { index: 7 })
        ));
    }

    #[test]
    fn test_blank_keys_are_unconfigured() {
        let creds = Credentials::new([Some("  "), Some("k2"), Some("")]);
        assert_eq!(creds.configured_slots(), vec![2]);
        assert!(creds.resolve(1).is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let creds = Credentials::new([Some("super-secret")]);
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("configured"));
    }
}
