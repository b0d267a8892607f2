//! Conversation statistics shown before a compression is dispatched.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static USER_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(user|human):").unwrap());

static AI_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^(ai|assistant|gemini|chatgpt|claude):").unwrap());

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```|function |const |import |class ").unwrap());

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://").unwrap());

static DECISION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(decided|chose|picked|selected|let's go with|we'll use)").unwrap()
});

/// Input tokens per word, used for the pre-flight estimate.
pub const TOKENS_PER_WORD: f64 = 1.3;

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Quick profile of a pasted transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationStats {
    pub words: usize,
    pub chars: usize,
    /// Non-blank lines
    pub lines: usize,
    pub estimated_tokens: usize,
    pub user_messages: usize,
    pub ai_messages: usize,
    pub has_code: bool,
    pub has_urls: bool,
    pub has_decisions: bool,
}

impl ConversationStats {
    /// Profile `text`, or `None` if it is blank.
    pub fn analyze(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }

        let words = word_count(text);
        Some(Self {
            words,
            chars: text.chars().count(),
            lines: text.lines().filter(|l| !l.trim().is_empty()).count(),
            estimated_tokens: (words as f64 * TOKENS_PER_WORD).round() as usize,
            user_messages: USER_LINE_REGEX.find_iter(text).count(),
            ai_messages: AI_LINE_REGEX.find_iter(text).count(),
            has_code: CODE_REGEX.is_match(text),
            has_urls: URL_REGEX.is_match(text),
            has_decisions: DECISION_REGEX.is_match(text),
        })
    }

    /// Uppercase hint labels for the detected content.
    pub fn hints(&self) -> Vec<&'static str> {
        let mut hints = Vec::new();
        if self.has_code {
            hints.push("CODE");
        }
        if self.has_urls {
            hints.push("URLS");
        }
        if self.has_decisions {
            hints.push("DECISIONS");
        }
        hints
    }
}
