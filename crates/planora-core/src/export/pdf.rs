//! PDF export: the plan laid out on A4 pages with the built-in Helvetica
//! fonts.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use crate::document::{DocumentError, PlanDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MM: f32 = 20.0;
const TOP_MM: f32 = 280.0;

/// A day block never starts below this line; it moves to a fresh page.
const DAY_BREAK_MM: f32 = 30.0;

/// Lines below this are pushed onto the next page.
const BOTTOM_MM: f32 = 15.0;

/// Characters per wrapped body line at the body font size.
const WRAP_CHARS: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Meta,
    DayHeader,
    Summary,
    Topic,
}

impl Style {
    fn font_size(self) -> f32 {
        match self {
            Self::Title => 16.0,
            Self::DayHeader => 12.0,
            Self::Meta | Self::Summary | Self::Topic => 10.0,
        }
    }

    fn indent_mm(self) -> f32 {
        match self {
            Self::Title | Self::Meta | Self::DayHeader => 0.0,
            Self::Summary => 3.0,
            Self::Topic => 5.0,
        }
    }

    /// Vertical space consumed by one line of this style.
    fn advance_mm(self) -> f32 {
        match self {
            Self::Title => 10.0,
            Self::Meta => 6.0,
            Self::DayHeader => 6.0,
            Self::Summary | Self::Topic => 5.0,
        }
    }

    fn bold(self) -> bool {
        matches!(self, Self::Title | Self::DayHeader)
    }
}

/// A line of text placed on a page at `y_mm` from the bottom edge.
#[derive(Debug, Clone, PartialEq)]
struct Placed {
    text: String,
    style: Style,
    y_mm: f32,
}

/// Render a plan as PDF bytes.
///
/// The first page opens with the plan title, course and exam date. Each day
/// follows as a bold header with its total minutes, the day's summary, and
/// one line per topic allocation. A day that would start near the bottom of
/// a page starts on the next one.
pub fn to_pdf(document: &PlanDocument) -> Result<Vec<u8>, DocumentError> {
    let pages = layout(document);
    let title = plan_title(document);

    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = builtin_font(&doc, BuiltinFont::Helvetica)?;
    let bold = builtin_font(&doc, BuiltinFont::HelveticaBold)?;

    let mut targets = vec![(first_page, first_layer)];
    for _ in 1..pages.len() {
        targets.push(doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"));
    }

    for ((page, layer), lines) in targets.into_iter().zip(&pages) {
        let layer = doc.get_page(page).get_layer(layer);
        for line in lines {
            let face = if line.style.bold() { &bold } else { &font };
            layer.use_text(
                &line.text,
                line.style.font_size(),
                Mm(LEFT_MM + line.style.indent_mm()),
                Mm(line.y_mm),
                face,
            );
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| DocumentError::Pdf(format!("save failed: {e}")))?;
    buf.into_inner()
        .map_err(|e| DocumentError::Pdf(format!("buffer flush failed: {e}")))
}

fn builtin_font(
    doc: &printpdf::PdfDocumentReference,
    font: BuiltinFont,
) -> Result<IndirectFontRef, DocumentError> {
    doc.add_builtin_font(font)
        .map_err(|e| DocumentError::Pdf(format!("font error: {e}")))
}

fn plan_title(document: &PlanDocument) -> String {
    format!("Planora Study Plan - {} Days", document.plan_length)
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Break the document into pages of positioned lines.
fn layout(document: &PlanDocument) -> Vec<Vec<Placed>> {
    let mut pages = Pager::default();
    let exam_date = document
        .exam_date
        .map_or_else(|| "not set".to_string(), |d| d.to_string());

    pages.push(plan_title(document), Style::Title);
    pages.push(format!("Course: {}", document.course_type), Style::Meta);
    pages.push(format!("Exam Date: {exam_date}"), Style::Meta);
    pages.gap(4.0);

    for day in &document.plan {
        if pages.y < DAY_BREAK_MM {
            pages.new_page();
        }
        let marker = if day.is_review { " (Review)" } else { "" };
        pages.push(
            format!("Day {}{marker} - {} minutes", day.day, day.total_minutes),
            Style::DayHeader,
        );
        for line in wrap_text(&day.daily_summary, WRAP_CHARS) {
            pages.push(line, Style::Summary);
        }
        for topic in &day.topics {
            let text = format!("- {} ({} min)", topic.title, topic.estimated_minutes);
            for line in wrap_text(&text, WRAP_CHARS) {
                pages.push(line, Style::Topic);
            }
        }
        pages.gap(3.0);
    }

    pages.finish()
}

struct Pager {
    done: Vec<Vec<Placed>>,
    current: Vec<Placed>,
    y: f32,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            done: Vec::new(),
            current: Vec::new(),
            y: TOP_MM,
        }
    }
}

impl Pager {
    fn push(&mut self, text: String, style: Style) {
        if self.y < BOTTOM_MM {
            self.new_page();
        }
        self.current.push(Placed {
            text,
            style,
            y_mm: self.y,
        });
        self.y -= style.advance_mm();
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn new_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
        self.y = TOP_MM;
    }

    fn finish(mut self) -> Vec<Vec<Placed>> {
        if !self.current.is_empty() || self.done.is_empty() {
            self.done.push(self.current);
        }
        self.done
    }
}

/// Greedy word wrap at `max_chars`. Always yields at least one line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + 1;
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
