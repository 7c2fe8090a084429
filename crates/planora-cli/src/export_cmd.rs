use std::io::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{Local, Utc};

use planora_core::PlanDocument;
use planora_core::export::{CalendarOptions, render};

use crate::OutputArgs;

/// Render a saved plan document in another format.
pub fn run_export(plan: &Path, output: &OutputArgs) -> anyhow::Result<()> {
    let document = PlanDocument::load(plan)?;
    write_rendered(&document, output)?;

    if let Some(path) = &output.output {
        println!(
            "Exported {} days as {} to {}",
            document.plan.len(),
            output.format,
            path.display()
        );
    }
    Ok(())
}

/// Render `document` per `output` and write it to the output file or stdout.
pub fn write_rendered(document: &PlanDocument, output: &OutputArgs) -> anyhow::Result<()> {
    let calendar = CalendarOptions {
        start_date: output
            .start_date
            .unwrap_or_else(|| Local::now().date_naive()),
        stamp: Utc::now(),
    };
    let rendered = render(document, output.format, calendar)?;
    write_output(&rendered, output.output.as_deref())
}

/// Write `contents` to `path`, or to stdout when no path is given.
///
/// A trailing newline is added to text output that lacks one. PDF bytes are
/// written untouched.
pub fn write_output(contents: &[u8], path: Option<&Path>) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = if let Some(path) = path {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    writer.write_all(contents)?;
    if !contents.starts_with(b"%PDF") && !contents.ends_with(b"\n") {
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
