//! iCalendar (RFC 5545) export: one all-day event per plan day.

use chrono::Days;
use icalendar::{Calendar, Component, Event, EventLike};
use sha2::{Digest, Sha256};

use super::CalendarOptions;
use super::text::format_minutes;
use crate::document::PlanDocument;

/// Render a plan as a VCALENDAR with one all-day VEVENT per day.
///
/// Day 1 falls on `calendar.start_date`. Event UIDs are derived from the
/// plan's course, exam date and length, so re-exporting the same plan
/// updates events instead of duplicating them.
pub fn to_ics(document: &PlanDocument, calendar: CalendarOptions) -> String {
    let fingerprint = plan_fingerprint(document);
    let mut ical = Calendar::new();

    for day in &document.plan {
        let offset = u64::from(day.day.saturating_sub(1));
        let Some(start) = calendar.start_date.checked_add_days(Days::new(offset)) else {
            continue;
        };
        let Some(end) = start.checked_add_days(Days::new(1)) else {
            continue;
        };

        let mut description: Vec<String> = day
            .topics
            .iter()
            .map(|t| format!("- {} ({})", t.title, format_minutes(t.estimated_minutes)))
            .collect();
        description.push(format!("Total: {}", format_minutes(day.total_minutes)));

        let mut event = Event::new();
        event
            .uid(&format!("planora-{fingerprint}-day-{}@planora", day.day))
            .timestamp(calendar.stamp)
            .starts(start)
            .ends(end)
            .summary(&day.daily_summary)
            .description(&description.join("\n"));
        if day.is_review {
            event.add_property("CATEGORIES", "REVIEW");
        }
        ical.push(event.done());
    }

    ical.done().to_string()
}

/// Short stable identifier for a plan: the first 12 hex chars of
/// SHA-256 over course, exam date and plan length.
fn plan_fingerprint(document: &PlanDocument) -> String {
    let exam_date = document
        .exam_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(document.course_type.as_bytes());
    hasher.update(b"|");
    hasher.update(exam_date.as_bytes());
    hasher.update(b"|");
    hasher.update(document.plan_length.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}
