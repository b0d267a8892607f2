//! Output-token budgeting for a single compression call.
//!
//! The budget is a cost and latency control, not a correctness bound: a
//! response truncated by the ceiling still parses, it just loses its tail.

use crate::depth::CompressionDepth;

/// Minimum budget for rolling updates. The merge has to reproduce the whole
/// prior document plus the new events, so it never drops below memory level.
pub const UPDATE_MIN_TOKENS: u32 = 3000;

/// Input words per output token in the scaling heuristic.
pub const WORDS_PER_OUTPUT_TOKEN: f64 = 4.0;

/// Floor for a depth regardless of conversation size.
pub fn base_tokens(depth: CompressionDepth) -> u32 {
    match depth {
        CompressionDepth::Snapshot => 1500,
        CompressionDepth::Memory => 2500,
        CompressionDepth::Full => 5000,
    }
}

/// Cap on the scaled component for a depth.
pub fn ceiling_tokens(depth: CompressionDepth) -> u32 {
    match depth {
        CompressionDepth::Snapshot => 2500,
        CompressionDepth::Memory => 5000,
        CompressionDepth::Full => 8000,
    }
}

/// Compute `maxOutputTokens` for a request.
///
/// `max(base, min(round(words / 4), ceiling))`, raised to at least
/// [`UPDATE_MIN_TOKENS`] when `is_update` is set.
pub fn estimate_max_output_tokens(word_count: usize, depth: CompressionDepth, is_update: bool) -> u32 {
    let scaled = (word_count as f64 / WORDS_PER_OUTPUT_TOKEN).round();
    let scaled = scaled.min(u32::MAX as f64) as u32;

    let result = base_tokens(depth).max(scaled.min(ceiling_tokens(depth)));

    if is_update {
        result.max(UPDATE_MIN_TOKENS)
    } else {
        result
    }
}
