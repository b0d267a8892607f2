//! Crumb file inspection: `crumb inspect`.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use crumb::crumb::{CrumbResult, NO_CONTENT, Section};

use super::compress::confidence_summary;

pub fn cmd_inspect(file: &Path, only: Option<Section>) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read crumb file {}", file.display()))?;
    let result = CrumbResult::from_raw(&raw);

    if let Some(section) = only {
        println!("{}", result.section(section));
        return Ok(());
    }

    println!();
    println!("{}", style(format!("Crumb File: {}", file.display())).bold().cyan());
    println!("{} words", result.word_count);
    println!();

    for section in Section::ALL {
        let body = result.section(section);
        println!("{}", style(section.heading()).bold());
        if body == NO_CONTENT {
            println!("  {}", style(body).dim());
        } else {
            for line in body.lines() {
                println!("  {}", line);
            }
        }
        println!();
    }

    let spans = result.tagged_spans();
    if !spans.is_empty() {
        println!("{}", style("Tagged lines").bold());
        for span in &spans {
            println!("  {:<12} {}", style(span.tag.marker()).yellow(), span.text);
        }
        println!();
    }

    println!("{}", confidence_summary(&result.confidence));
    if let Some(data) = result.confidence.as_option() {
        let b = &data.breakdown;
        println!("  goals captured       {:>5.0}", b.goals_captured);
        println!("  decisions preserved  {:>5.0}", b.decisions_preserved);
        println!("  technical context    {:>5.0}", b.technical_context);
        println!("  constraints noted    {:>5.0}", b.constraints_noted);
    }
    println!();

    Ok(())
}
