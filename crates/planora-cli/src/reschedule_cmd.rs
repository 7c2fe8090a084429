//! CLI handler for `planora reschedule`.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};

use planora_core::PlanDocument;
use planora_core::reschedule::{DoneMarker, reschedule};

use crate::export_cmd::write_output;

/// Load a plan, drop the finished allocations, and write a fresh plan for
/// what is left as JSON.
pub fn run_reschedule(
    plan: &Path,
    done: &[DoneMarker],
    today: Option<NaiveDate>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let document = PlanDocument::load(plan)?;

    for marker in done {
        let known = document
            .plan
            .iter()
            .find(|d| d.day == marker.day)
            .is_some_and(|d| marker.index <= d.topics.len());
        if !known {
            tracing::warn!(
                day = marker.day,
                index = marker.index,
                "done marker does not match any allocation"
            );
        }
    }

    let done: HashSet<DoneMarker> = done.iter().copied().collect();
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let next = reschedule(&document, &done, today)
        .with_context(|| format!("failed to reschedule {}", plan.display()))?;

    write_output(next.to_json()?.as_bytes(), output)?;

    if let Some(path) = output {
        println!(
            "Rescheduled {} topics over {} days to {}",
            next.topics_count,
            next.plan_length,
            path.display()
        );
    }
    Ok(())
}
