//! Crumb document types.
//!
//! Defines the canonical section layout, the inline span tags the model is
//! asked to emit, and the confidence assessment appended to each response.

use serde::{Deserialize, Serialize};

/// One of the seven level-2 sections every crumb file carries, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Mission,
    CurrentState,
    DecisionsMade,
    DeadEnds,
    KeyContext,
    OpenQuestions,
    NextStep,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Mission,
        Section::CurrentState,
        Section::DecisionsMade,
        Section::DeadEnds,
        Section::KeyContext,
        Section::OpenQuestions,
        Section::NextStep,
    ];

    /// Heading label as it appears after the emoji, e.g. `CURRENT STATE`.
    ///
    /// Section lookup matches on this label as a substring, so no label may
    /// contain another.
    pub fn label(self) -> &'static str {
        match self {
            Section::Mission => "MISSION",
            Section::CurrentState => "CURRENT STATE",
            Section::DecisionsMade => "DECISIONS MADE",
            Section::DeadEnds => "DEAD ENDS",
            Section::KeyContext => "KEY CONTEXT",
            Section::OpenQuestions => "OPEN QUESTIONS",
            Section::NextStep => "NEXT STEP",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Section::Mission => "🎯",
            Section::CurrentState => "📍",
            Section::DecisionsMade => "✅",
            Section::DeadEnds => "❌",
            Section::KeyContext => "🧩",
            Section::OpenQuestions => "❓",
            Section::NextStep => "🚀",
        }
    }

    /// Full Markdown heading line, e.g. `## 🎯 MISSION`.
    pub fn heading(self) -> String {
        format!("## {} {}", self.emoji(), self.label())
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ").to_uppercase();
        Section::ALL
            .into_iter()
            .find(|section| section.label() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown section '{}'. Valid values: mission, current-state, decisions-made, \
                     dead-ends, key-context, open-questions, next-step",
                    s
                )
            })
    }
}

/// Semantic category of an inline-tagged line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpanTag {
    Decision,
    Goal,
    Code,
    Constraint,
}

impl SpanTag {
    pub const ALL: [SpanTag; 4] = [
        SpanTag::Decision,
        SpanTag::Goal,
        SpanTag::Code,
        SpanTag::Constraint,
    ];

    /// Literal marker the model writes inline, e.g. `[Decision]`.
    pub fn marker(self) -> &'static str {
        match self {
            SpanTag::Decision => "[Decision]",
            SpanTag::Goal => "[Goal]",
            SpanTag::Code => "[Code]",
            SpanTag::Constraint => "[Constraint]",
        }
    }

    /// Uppercase name reported for extracted spans.
    pub fn name(self) -> &'static str {
        match self {
            SpanTag::Decision => "DECISION",
            SpanTag::Goal => "GOAL",
            SpanTag::Code => "CODE",
            SpanTag::Constraint => "CONSTRAINT",
        }
    }

    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "DECISION" => Some(SpanTag::Decision),
            "GOAL" => Some(SpanTag::Goal),
            "CODE" => Some(SpanTag::Code),
            "CONSTRAINT" => Some(SpanTag::Constraint),
            _ => None,
        }
    }
}

impl std::fmt::Display for SpanTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A line of the crumb file annotated with a [`SpanTag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub tag: SpanTag,
    /// Line text with the bullet marker and the tag removed.
    pub text: String,
}

/// Per-dimension scores inside the confidence block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub goals_captured: f64,
    pub decisions_preserved: f64,
    pub technical_context: f64,
    pub constraints_noted: f64,
}

/// The model's self-assessment of how completely the context was preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceData {
    /// Overall score, 0-100
    pub confidence: f64,
    pub breakdown: ConfidenceBreakdown,
    /// Number of the seven sections with real content
    pub sections_filled: u32,
    pub key_topics_found: u32,
}

/// Coarse rating of an overall confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceBand::High => write!(f, "high"),
            ConfidenceBand::Medium => write!(f, "medium"),
            ConfidenceBand::Low => write!(f, "low"),
        }
    }
}

impl ConfidenceData {
    pub const MAX_SECTIONS: u32 = Section::ALL.len() as u32;

    /// Check score ranges and the section count.
    pub fn is_valid(&self) -> bool {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        in_range(self.confidence)
            && in_range(self.breakdown.goals_captured)
            && in_range(self.breakdown.decisions_preserved)
            && in_range(self.breakdown.technical_context)
            && in_range(self.breakdown.constraints_noted)
            && self.sections_filled <= Self::MAX_SECTIONS
    }

    pub fn band(&self) -> ConfidenceBand {
        if self.confidence >= 80.0 {
            ConfidenceBand::High
        } else if self.confidence >= 60.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Outcome of a best-effort extraction.
///
/// `NotFound` covers both an absent and a malformed payload; callers treat
/// either as "unknown" and carry on.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    Found(T),
    NotFound,
}

impl<T> Extracted<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Extracted::Found(value) => Some(value),
            Extracted::NotFound => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Extracted::Found(value) => Some(value),
            Extracted::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Extracted<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Extracted::Found(v),
            None => Extracted::NotFound,
        }
    }
}
