//! Conversation statistics: `crumb stats`.

use anyhow::Result;
use console::style;
use std::path::Path;

use crumb::budget::estimate_max_output_tokens;
use crumb::depth::CompressionDepth;
use crumb::orchestrator::MAX_CONVERSATION_CHARS;
use crumb::stats::ConversationStats;

use super::read_input;

pub fn cmd_stats(input: Option<&Path>) -> Result<()> {
    let text = read_input(input)?;

    let Some(stats) = ConversationStats::analyze(&text) else {
        println!("Conversation is empty.");
        return Ok(());
    };

    println!();
    println!("{}", style("Conversation Stats").bold().cyan());
    println!("==================");
    println!("  words            {}", stats.words);
    println!("  characters       {}", stats.chars);
    println!("  lines            {}", stats.lines);
    println!("  ~tokens          {}", stats.estimated_tokens);
    println!("  user messages    {}", stats.user_messages);
    println!("  ai messages      {}", stats.ai_messages);

    let hints = stats.hints();
    if !hints.is_empty() {
        println!("  contains         {}", hints.join(", "));
    }

    if stats.chars > MAX_CONVERSATION_CHARS {
        println!();
        println!(
            "  {} over the {} character limit by {}",
            style("⚠").yellow(),
            MAX_CONVERSATION_CHARS,
            stats.chars - MAX_CONVERSATION_CHARS
        );
    }

    println!();
    println!("Output budget (max tokens):");
    for depth in CompressionDepth::ALL {
        println!(
            "  {:<10} {}",
            depth.as_str(),
            estimate_max_output_tokens(stats.words, depth, false)
        );
    }
    println!();

    Ok(())
}
