//! Plain-text rendering of a plan.

use std::fmt::Write;

use crate::document::PlanDocument;

const RULE_WIDTH: usize = 50;

/// Render a plan as a human-readable text listing.
pub fn to_text(document: &PlanDocument) -> String {
    let mut out = String::new();
    let exam_date = document
        .exam_date
        .map_or_else(|| "not set".to_string(), |d| d.to_string());

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Planora Study Plan - {} Days", document.plan_length);
    let _ = writeln!(out, "Course: {}", document.course_type);
    let _ = writeln!(out, "Exam Date: {exam_date}");
    let _ = writeln!(out, "Exam Type: {}", document.exam_type);
    let _ = writeln!(out, "Hours/Day: {}", document.hours_per_day);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for day in &document.plan {
        let marker = if day.is_review { " (REVIEW)" } else { "" };
        let _ = writeln!(out, "Day {}{marker}", day.day);
        let _ = writeln!(
            out,
            "  Time: {} minutes ({})",
            day.total_minutes,
            format_minutes(day.total_minutes)
        );
        let _ = writeln!(out, "  Summary: {}", day.daily_summary);
        for topic in &day.topics {
            let _ = writeln!(out, "    - {} ({} min)", topic.title, topic.estimated_minutes);
        }
        out.push('\n');
    }

    out
}

/// Format minutes as `"1h 5m"`, or `"45m"` under an hour.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{rest}m")
    }
}
