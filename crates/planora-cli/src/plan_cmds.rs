//! CLI handlers for syllabus commands.
//!
//! Implements:
//! - `planora topics <source>` -- list the topics extracted from a syllabus
//! - `planora plan <source>`   -- generate a plan and render it

use anyhow::{Context, Result};
use chrono::NaiveDate;

use planora_core::PlanDocument;
use planora_core::difficulty::{DEFAULT_HOURS_PER_100_CHARS, estimate_time, topic_difficulty};
use planora_core::export::format_minutes;
use planora_core::extract_topics;

use crate::config::{PlanOverrides, PlanoraConfig};
use crate::export_cmd::write_rendered;
use crate::{OutputArgs, SourceArgs};

/// Settings for `planora plan` beyond the source and output.
#[derive(Debug, Default)]
pub struct PlanSettings {
    pub overrides: PlanOverrides,
    pub exam_date: Option<NaiveDate>,
    pub weight_by_difficulty: bool,
}

// -----------------------------------------------------------------------
// planora topics <source>
// -----------------------------------------------------------------------

/// Print a table of extracted topics with their difficulty and a
/// standalone effort estimate.
pub fn run_topics(source: &SourceArgs) -> Result<()> {
    let text = source.input().resolve()?;
    let topics = extract_topics(&text);

    if topics.is_empty() {
        println!("No topics found.");
        return Ok(());
    }

    let title_w = topics
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    println!(
        "{:>3}  {:<title_w$}  {:>6}  {:>10}  {:>8}",
        "#", "Title", "Length", "Difficulty", "Estimate"
    );
    println!("{}", "-".repeat(3 + 2 + title_w + 2 + 6 + 2 + 10 + 2 + 8));

    for (i, topic) in topics.iter().enumerate() {
        let difficulty = topic_difficulty(topic);
        let estimate = estimate_time(topic.length, difficulty, DEFAULT_HOURS_PER_100_CHARS);
        println!(
            "{:>3}  {:<title_w$}  {:>6}  {:>10}  {:>8}",
            i + 1,
            topic.title,
            topic.length,
            difficulty.to_string(),
            format_minutes(estimate)
        );
    }

    println!();
    println!("{} topics", topics.len());
    Ok(())
}

// -----------------------------------------------------------------------
// planora plan <source>
// -----------------------------------------------------------------------

/// Resolve settings, run the pipeline, and write the plan in the requested
/// format.
pub fn run_plan(source: &SourceArgs, settings: &PlanSettings, output: &OutputArgs) -> Result<()> {
    let config = PlanoraConfig::resolve(&settings.overrides)?;
    let mut options = config.plan_options();
    options.exam_date = settings.exam_date;
    options.weight_by_difficulty = settings.weight_by_difficulty;

    let text = source.input().resolve()?;
    let document = PlanDocument::generate(&text, &options).context("failed to generate plan")?;

    write_rendered(&document, output)?;

    if let Some(path) = &output.output {
        println!(
            "Wrote {}-day plan ({} topics, {} review days) to {}",
            document.plan_length,
            document.topics_count,
            document.review_day_count(),
            path.display()
        );
    }
    Ok(())
}
