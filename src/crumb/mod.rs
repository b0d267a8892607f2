//! Crumb file parsing.
//!
//! A completion comes back as a hybrid blob: the Markdown crumb file with
//! seven fixed sections, followed by a fenced JSON confidence block:
//!
//! - ```` ```json {"confidence": 80, ...} ``` ```` - self-assessed coverage
//! - `## 🎯 MISSION` ... `## 🚀 NEXT STEP` - the canonical sections
//! - `[Decision]`, `[Goal]`, `[Code]`, `[Constraint]` - inline span tags
//!
//! These functions split the blob into the displayable document and the
//! structured assessment, and pull sections and tagged lines back out.

mod parser;
mod types;

pub use parser::{
    CrumbResult, NO_CONTENT, extract_confidence, extract_section, extract_tagged_spans,
    section_body, strip_confidence,
};
pub use types::{
    ConfidenceBand, ConfidenceBreakdown, ConfidenceData, Extracted, Section, SpanTag, TaggedSpan,
};
