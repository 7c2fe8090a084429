//! Plan exporters: JSON, plain text, iCalendar, and PDF.

mod ics;
mod pdf;
mod text;

pub use ics::to_ics;
pub use pdf::to_pdf;
pub use text::{format_minutes, to_text};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::document::{DocumentError, PlanDocument};

/// Output format for a rendered plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Text,
    Ics,
    Pdf,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Ics => "ics",
            Self::Pdf => "pdf",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            "ics" | "ical" => Ok(Self::Ics),
            "pdf" => Ok(Self::Pdf),
            other => Err(ExportFormatParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ExportFormat`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid export format: {0:?} (expected json, text, ics, or pdf)")]
pub struct ExportFormatParseError(pub String);

/// Calendar placement for the iCalendar export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarOptions {
    /// Date of day 1.
    pub start_date: chrono::NaiveDate,
    /// `DTSTAMP` written on every event.
    pub stamp: chrono::DateTime<chrono::Utc>,
}

/// Render a document in the requested format.
///
/// Text formats come back as their UTF-8 bytes; PDF is binary.
pub fn render(
    document: &PlanDocument,
    format: ExportFormat,
    calendar: CalendarOptions,
) -> Result<Vec<u8>, DocumentError> {
    match format {
        ExportFormat::Json => document.to_json().map(String::into_bytes),
        ExportFormat::Text => Ok(to_text(document).into_bytes()),
        ExportFormat::Ics => Ok(to_ics(document, calendar).into_bytes()),
        ExportFormat::Pdf => to_pdf(document),
    }
}
