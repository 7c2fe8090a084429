//! Re-plan the unfinished part of an existing plan over the days left.
//!
//! Rescheduling keeps no state of its own: it collects the titles of
//! allocations not yet marked done, then runs them through the normal
//! extract-and-allocate pipeline as a manual topic list.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::document::{PlanDocument, PlanOptions};
use crate::plan::{PlanRequest, PlanRequestError};

static PART_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \(Part \d+\)$").unwrap());

/// Plan length used when the document has no exam date.
pub const DEFAULT_DAYS_LEFT: u32 = 7;

/// Errors while rescheduling a plan.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RescheduleError {
    #[error("invalid done marker {0:?} (expected DAY:INDEX, e.g. 2:1)")]
    InvalidMarker(String),

    #[error("all topics are marked done; nothing to reschedule")]
    NothingRemaining,

    #[error(transparent)]
    Plan(#[from] PlanRequestError),
}

/// Identifies one allocation in a plan: its day number and 1-based position
/// within that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoneMarker {
    pub day: u32,
    pub index: usize,
}

impl FromStr for DoneMarker {
    type Err = RescheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RescheduleError::InvalidMarker(s.to_owned());
        let (day, index) = s.trim().split_once(':').ok_or_else(invalid)?;
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;
        let index: usize = index.trim().parse().map_err(|_| invalid())?;
        if day == 0 || index == 0 {
            return Err(invalid());
        }
        Ok(Self { day, index })
    }
}

/// Topic titles with at least one allocation not marked done, in plan
/// order.
///
/// `(Part N)` suffixes are stripped so a split topic is listed once and
/// re-split as needed by the new plan.
pub fn remaining_titles(document: &PlanDocument, done: &HashSet<DoneMarker>) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    for day in &document.plan {
        for (i, allocation) in day.topics.iter().enumerate() {
            let marker = DoneMarker {
                day: day.day,
                index: i + 1,
            };
            if done.contains(&marker) {
                continue;
            }
            let title = base_title(&allocation.title);
            if !titles.iter().any(|t| t == title) {
                titles.push(title.to_string());
            }
        }
    }
    titles
}

/// Strip a trailing ` (Part N)` added when a topic was split across days.
fn base_title(title: &str) -> &str {
    PART_SUFFIX
        .find(title)
        .map_or(title, |m| &title[..m.start()])
}

/// Whole days from `today` until the exam, at least 1.
///
/// Without an exam date the plan gets [`DEFAULT_DAYS_LEFT`] days.
pub fn days_left(exam_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(exam) = exam_date else {
        return DEFAULT_DAYS_LEFT;
    };
    let days = (exam - today).num_days();
    u32::try_from(days.max(1)).unwrap_or(u32::MAX)
}

/// Build a new plan for the unfinished allocations of `document`.
///
/// Hours per day, exam type, review fraction, course and exam date carry
/// over; the plan length becomes the number of days left before the exam.
pub fn reschedule(
    document: &PlanDocument,
    done: &HashSet<DoneMarker>,
    today: NaiveDate,
) -> Result<PlanDocument, RescheduleError> {
    let remaining = remaining_titles(document, done);
    if remaining.is_empty() {
        return Err(RescheduleError::NothingRemaining);
    }

    let plan_length = days_left(document.exam_date, today);
    let request = PlanRequest::new(plan_length, document.hours_per_day, document.exam_type)
        .with_review_day_fraction(document.review_day_fraction);

    let mut options = PlanOptions::new(request);
    options.exam_date = document.exam_date;
    options.course_type = document.course_type.clone();

    let rescheduled = PlanDocument::generate(&remaining.join("\n"), &options)?;
    info!(
        remaining = remaining.len(),
        days = plan_length,
        "rescheduled remaining topics"
    );
    Ok(rescheduled)
}
