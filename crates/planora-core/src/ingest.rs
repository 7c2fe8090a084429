//! Resolve syllabus text from the available inputs.
//!
//! Sources are tried in priority order: a manual topic list, then a file,
//! then pasted syllabus text. PDF files are read with `pdf-extract`; image
//! files are rejected because OCR runs outside this crate.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// Errors while resolving syllabus text.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to extract text from PDF {path}: {message}")]
    Pdf { path: String, message: String },

    #[error("{path} is an image; run OCR on it first and pass the text instead")]
    Image { path: String },

    #[error("no syllabus, topics, or readable file provided")]
    NoContent,
}

/// The inputs a caller may supply; any subset may be present.
#[derive(Debug, Clone, Default)]
pub struct SourceInput {
    /// Manual topic list, one topic per line.
    pub topics_text: Option<String>,
    /// A syllabus file (PDF or plain text).
    pub file: Option<PathBuf>,
    /// Pasted syllabus text, used when nothing else yields content.
    pub syllabus_text: Option<String>,
}

impl SourceInput {
    /// Resolve the text to extract topics from.
    ///
    /// A manual topic list wins over a file, which wins over pasted text.
    /// If the chosen source yields no text, pasted text is the fallback.
    /// Read errors and image files are reported rather than skipped.
    pub fn resolve(&self) -> Result<String, IngestError> {
        let mut text = String::new();

        if let Some(topics) = self.topics_text.as_deref().filter(|t| !t.trim().is_empty()) {
            debug!(source = "topics", "using manual topic list");
            text = topics.to_string();
        } else if let Some(path) = &self.file {
            debug!(source = "file", path = %path.display(), "reading syllabus file");
            text = read_syllabus_file(path)?;
        }

        if text.trim().is_empty() {
            if let Some(pasted) = self.syllabus_text.as_deref() {
                text = pasted.to_string();
            }
        }

        if text.trim().is_empty() {
            return Err(IngestError::NoContent);
        }
        Ok(text)
    }
}

/// Read a syllabus file, dispatching on its type.
pub fn read_syllabus_file(path: &Path) -> Result<String, IngestError> {
    if is_image(path) {
        return Err(IngestError::Image {
            path: path.display().to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.display().to_string(),
        source,
    })?;

    if is_pdf(path, &bytes) {
        return extract_pdf_text(path, &bytes);
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!(path = %path.display(), "file is not valid UTF-8; decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Extract PDF text, re-joining pages with blank lines.
fn extract_pdf_text(path: &Path, bytes: &[u8]) -> Result<String, IngestError> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Pdf {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(join_pages(&raw))
}

/// `pdf-extract` separates pages with form feeds.
fn join_pages(raw: &str) -> String {
    raw.split('\x0C')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn is_pdf(path: &Path, bytes: &[u8]) -> bool {
    extension(path).as_deref() == Some("pdf") || bytes.starts_with(b"%PDF")
}
