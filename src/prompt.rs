//! Compression prompt templates.
//!
//! Two prompt shapes share one output contract:
//!
//! - **Compression prompt**: depth-specific verbosity instructions plus the
//!   contract, followed by the conversation to condense
//! - **Update prompt**: merges new conversation events into an existing crumb
//!   file; used whenever a prior crumb is supplied, regardless of depth
//!
//! Both are pure string construction.

use crate::crumb::Section;
use crate::depth::CompressionDepth;

pub const SNAPSHOT_INSTRUCTIONS: &str = "COMPRESSION DEPTH: SNAPSHOT\n\
Be brutally concise. Aim for roughly 500 tokens in total. Keep one or two \
bullets per section and only what is needed to resume the work.";

pub const MEMORY_INSTRUCTIONS: &str = "COMPRESSION DEPTH: MEMORY\n\
Balanced detail. Aim for roughly 1000 tokens in total. Capture every decision \
and constraint with a short reason, drop conversational filler.";

pub const FULL_INSTRUCTIONS: &str = "COMPRESSION DEPTH: FULL\n\
Rich detail. Aim for roughly 3000 tokens in total. Keep exact names, commands, \
short code excerpts, error messages and the nuance behind each decision.";

const COMPRESSION_PREAMBLE: &str = "You are an expert at extracting and compressing the \
essential meaning from AI conversations.

Analyze the conversation and create a structured \"Crumb File\": a portable memory \
snapshot that lets any AI instantly understand the full context and continue seamlessly.";

const UPDATE_PREAMBLE: &str = "You maintain a rolling \"Crumb File\": a portable memory \
snapshot of an ongoing AI conversation.

The EXISTING CRUMB FILE below is the prior memory state. The NEW CONVERSATION below \
contains events that happened after it was written. Merge them into one updated Crumb \
File:
- Keep everything from the existing file that is still true
- Add new goals, decisions, dead ends, context and questions from the new conversation
- Update CURRENT STATE and NEXT STEP to reflect the latest events
- Remove open questions that the new conversation resolved";

fn section_guidance(section: Section) -> &'static str {
    match section {
        Section::Mission => "What is the core goal being worked on? One clear paragraph.",
        Section::CurrentState => {
            "Where exactly did things end? What is done and what is in progress?"
        }
        Section::DecisionsMade => "Key decisions reached and the brief reasoning behind each one.",
        Section::DeadEnds => "What was tried and failed, so it is never repeated.",
        Section::KeyContext => {
            "Important background, constraints, preferences and facts the AI needs to know."
        }
        Section::OpenQuestions => "What is still unresolved or needs to be decided next.",
        Section::NextStep => "The single most important thing to do next. Be specific.",
    }
}

/// Fixed output contract shared by both prompt shapes.
pub fn output_contract() -> String {
    let mut contract = String::new();

    contract.push_str("Output a Markdown document with exactly these sections, in this order:\n\n");
    contract.push_str("# 🍞 CRUMB FILE\n");
    contract.push_str("*Compressed by Crumb — Leave a trail. Never lose context.*\n\n");
    for section in Section::ALL {
        contract.push_str(&section.heading());
        contract.push('\n');
        contract.push_str(section_guidance(section));
        contract.push_str("\n\n");
    }
    contract.push_str("---\n");
    contract.push_str("*Original: ~[word count] words → Crumb: ~[crumb word count] words*\n\n");

    contract.push_str("Inline tags:\n");
    contract.push_str(
        "Start every bullet that states a goal, decision, code fact or constraint with exactly \
         one of these literal tags: ",
    );
    let markers: Vec<&str> = crate::crumb::SpanTag::ALL
        .iter()
        .map(|tag| tag.marker())
        .collect();
    contract.push_str(&markers.join(", "));
    contract.push_str(". Example: `- [Decision] chose Postgres for the ledger`\n\n");

    contract.push_str("Confidence block:\n");
    contract.push_str(
        "After the footer, append exactly one fenced JSON block scoring how completely the \
         context was preserved (all scores 0-100, sections_filled 0-7):\n\n",
    );
    contract.push_str(
        "```json\n\
         {\n  \"confidence\": 0,\n  \"breakdown\": {\n    \"goals_captured\": 0,\n    \
         \"decisions_preserved\": 0,\n    \"technical_context\": 0,\n    \
         \"constraints_noted\": 0\n  },\n  \"sections_filled\": 0,\n  \
         \"key_topics_found\": 0\n}\n\
         ```\n\n",
    );

    contract.push_str("Rules:\n");
    contract.push_str("- Be precise and information-dense\n");
    contract.push_str("- Use bullet points inside sections\n");
    contract.push_str("- Never rename, merge or skip a section heading\n");
    contract.push_str(
        "- Write so any AI reading this can continue immediately with zero additional context",
    );

    contract
}

/// Verbosity instructions for a depth.
pub fn depth_instructions(depth: CompressionDepth) -> &'static str {
    match depth {
        CompressionDepth::Snapshot => SNAPSHOT_INSTRUCTIONS,
        CompressionDepth::Memory => MEMORY_INSTRUCTIONS,
        CompressionDepth::Full => FULL_INSTRUCTIONS,
    }
}

/// Build the instruction text for a fresh compression.
pub fn build_compression_prompt(depth: CompressionDepth) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        COMPRESSION_PREAMBLE,
        depth_instructions(depth),
        output_contract()
    )
}

/// Build the full compression request: instructions, then the transcript.
///
/// `word_count` feeds the model's self-reported footer line.
pub fn compose_compression_request(
    depth: CompressionDepth,
    conversation: &str,
    word_count: usize,
) -> String {
    format!(
        "{}\n\nHere is the conversation to compress (approximately {} words):\n\n{}",
        build_compression_prompt(depth),
        word_count,
        conversation
    )
}

/// Build the merge prompt for a rolling update.
pub fn build_update_prompt(existing_crumb: &str, new_conversation: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(UPDATE_PREAMBLE);
    prompt.push_str("\n\n");
    prompt.push_str(&output_contract());
    prompt.push_str("\n\n");

    prompt.push_str("## EXISTING CRUMB FILE\n\n");
    prompt.push_str(existing_crumb.trim());
    prompt.push_str("\n\n");

    prompt.push_str(&format!(
        "## NEW CONVERSATION (approximately {} words)\n\n",
        crate::stats::word_count(new_conversation)
    ));
    prompt.push_str(new_conversation);

    prompt
}
