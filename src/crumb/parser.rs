//! Parsing of the hybrid Markdown + JSON completion response.
//!
//! The model returns one blob: the crumb file in Markdown followed by a
//! fenced JSON confidence block. Everything here is pure and never fails
//! outward; missing or malformed optional data degrades to "not found".

use super::types::{ConfidenceData, Extracted, Section, SpanTag, TaggedSpan};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Returned by [`extract_section`] when the heading is missing or empty.
pub const NO_CONTENT: &str = "No content extracted.";

// Compile regexes once using LazyLock
static CONFIDENCE_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json(.*?)```").unwrap());

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[(Decision|Goal|Code|Constraint)\]").unwrap());

static BULLET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*\-]\s*").unwrap());

/// Parse the first ```` ```json ```` fence as [`ConfidenceData`].
///
/// Absent fence, invalid JSON, a schema mismatch or out-of-range scores all
/// yield [`Extracted::NotFound`].
pub fn extract_confidence(raw: &str) -> Extracted<ConfidenceData> {
    let Some(body) = CONFIDENCE_FENCE_REGEX
        .captures(raw)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
    else {
        debug!("No confidence block in response");
        return Extracted::NotFound;
    };

    match serde_json::from_str::<ConfidenceData>(body) {
        Ok(data) if data.is_valid() => Extracted::Found(data),
        Ok(data) => {
            debug!(
                confidence = data.confidence,
                sections_filled = data.sections_filled,
                "Confidence block out of range, ignoring"
            );
            Extracted::NotFound
        }
        Err(e) => {
            debug!(error = %e, "Malformed confidence block, ignoring");
            Extracted::NotFound
        }
    }
}

/// Remove the first ```` ```json ```` fence and trim the result.
///
/// Text without a fence comes back trimmed and otherwise unchanged.
pub fn strip_confidence(raw: &str) -> String {
    CONFIDENCE_FENCE_REGEX.replace(raw, "").trim().to_string()
}

enum SectionScan {
    Seeking,
    Capturing,
    Done,
}

/// Body of the section whose heading line contains `heading`.
///
/// Matching is by substring, so `"MISSION"` finds `## 🎯 MISSION`. Capture
/// stops at the next line starting with `## `. Blank lines are dropped.
/// Returns [`NO_CONTENT`] if nothing was captured.
pub fn extract_section(document: &str, heading: &str) -> String {
    let mut state = SectionScan::Seeking;
    let mut captured: Vec<&str> = Vec::new();

    for line in document.lines() {
        match state {
            SectionScan::Seeking => {
                if line.contains(heading) {
                    state = SectionScan::Capturing;
                }
            }
            SectionScan::Capturing => {
                if line.starts_with("## ") {
                    state = SectionScan::Done;
                } else if !line.trim().is_empty() {
                    captured.push(line);
                }
            }
            SectionScan::Done => break,
        }
    }

    let body = captured.join("\n");
    let body = body.trim();
    if body.is_empty() {
        NO_CONTENT.to_string()
    } else {
        body.to_string()
    }
}

/// [`extract_section`] for one of the canonical sections.
pub fn section_body(document: &str, section: Section) -> String {
    extract_section(document, section.label())
}

/// Collect every line carrying an inline tag, top to bottom.
///
/// Only the first tag on a line counts. The tag name is matched
/// case-insensitively; the bracket syntax is not.
pub fn extract_tagged_spans(text: &str) -> Vec<TaggedSpan> {
    let mut spans = Vec::new();

    for line in text.lines() {
        let Some(cap) = TAG_REGEX.captures(line) else {
            continue;
        };
        let Some(tag) = cap.get(1).and_then(|m| SpanTag::from_name(m.as_str())) else {
            continue;
        };

        let unbulleted = BULLET_REGEX.replace(line.trim_start(), "");
        let remainder = TAG_REGEX.replace(&unbulleted, "");
        spans.push(TaggedSpan {
            tag,
            text: remainder.trim().to_string(),
        });
    }

    spans
}

/// A parsed completion: the displayable document plus its confidence block.
#[derive(Debug, Clone, PartialEq)]
pub struct CrumbResult {
    /// Markdown with the confidence fence removed
    pub document: String,
    pub confidence: Extracted<ConfidenceData>,
    /// Whitespace-separated words in `document`
    pub word_count: usize,
}

impl CrumbResult {
    /// Split a raw hybrid response into its two artifacts.
    pub fn from_raw(raw: &str) -> Self {
        let document = strip_confidence(raw);
        let confidence = extract_confidence(raw);
        let word_count = crate::stats::word_count(&document);
        Self {
            document,
            confidence,
            word_count,
        }
    }

    /// Overall confidence score, if the block parsed.
    pub fn score(&self) -> Option<f64> {
        self.confidence.as_option().map(|c| c.confidence)
    }

    pub fn section(&self, section: Section) -> String {
        section_body(&self.document, section)
    }

    pub fn tagged_spans(&self) -> Vec<TaggedSpan> {
        extract_tagged_spans(&self.document)
    }
}
