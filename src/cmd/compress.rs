//! Conversation compression: `crumb compress`.

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crumb::config::Config;
use crumb::crumb::{ConfidenceBand, ConfidenceData, CrumbResult, Extracted};
use crumb::depth::CompressionDepth;
use crumb::orchestrator::{CompressionRequest, Compressor};
use crumb::vault::NewVaultEntry;

use super::super::Cli;
use super::read_input;

/// Borrowed `Compress` arguments.
pub struct CompressArgs<'a> {
    pub input: Option<&'a Path>,
    pub depth: Option<CompressionDepth>,
    pub server: Option<usize>,
    pub update: Option<&'a Path>,
    pub output: Option<&'a Path>,
    pub save: bool,
}

pub async fn cmd_compress(cli: &Cli, args: CompressArgs<'_>) -> Result<()> {
    let config = Config::load(cli.config.clone())?;

    let conversation = read_input(args.input)?;
    let existing = match args.update {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read crumb file {}", path.display()))?,
        ),
        None => None,
    };

    let depth = args.depth.unwrap_or(config.toml.defaults.depth);
    let request = CompressionRequest::new(conversation)
        .with_depth(depth)
        .with_server(args.server.unwrap_or(config.toml.defaults.server))
        .with_existing_crumb(existing);
    request.validate()?;

    let compressor = Compressor::new(config.client()?);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("progress bar template is a valid static string"),
    );
    spinner.set_message(if request.is_update() {
        format!("Updating crumb file ({})...", depth)
    } else {
        format!("Compressing conversation ({})...", depth)
    });
    spinner.enable_steady_tick(Duration::from_millis(100));

    let raw = compressor.compress(&request).await;
    spinner.finish_and_clear();
    let raw = raw?;

    let result = CrumbResult::from_raw(&raw);

    match args.output {
        Some(path) => {
            std::fs::write(path, &result.document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", style(path.display()).cyan());
        }
        None => println!("{}", result.document),
    }

    eprintln!(
        "{} {} words",
        style("Crumb file:").bold(),
        result.word_count
    );
    eprintln!("{}", confidence_summary(&result.confidence));

    if args.save {
        let saved = config
            .vault()
            .save_entry(NewVaultEntry::from_result(&result, depth))
            .context("Failed to save crumb file to vault")?;
        eprintln!("Saved to vault as {}", style(&saved.id).dim());
    }

    Ok(())
}

/// One-line confidence report, coloured by band.
pub fn confidence_summary(confidence: &Extracted<ConfidenceData>) -> String {
    match confidence {
        Extracted::Found(data) => {
            let score = format!("{:.0}% ({})", data.confidence, data.band());
            let score = match data.band() {
                ConfidenceBand::High => style(score).green(),
                ConfidenceBand::Medium => style(score).yellow(),
                ConfidenceBand::Low => style(score).red(),
            };
            format!(
                "{} {}  sections {}/{}  topics {}",
                style("Confidence:").bold(),
                score,
                data.sections_filled,
                ConfidenceData::MAX_SECTIONS,
                data.key_topics_found
            )
        }
        Extracted::NotFound => format!("{} {}", style("Confidence:").bold(), style("unavailable").dim()),
    }
}
