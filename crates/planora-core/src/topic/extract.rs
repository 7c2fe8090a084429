//! Heuristic topic extraction from raw syllabus text.
//!
//! Extraction is an ordered chain of independent strategies. Each strategy
//! either claims the text (returning at least one topic) or declines, and
//! the first strategy to claim it wins:
//!
//! 1. manual list: every non-empty line is short, so each line is a topic
//! 2. chapter headings: lines starting with `Chapter <n>`
//! 3. inline chapter markers: `chapter <n>:` anywhere in the text
//! 4. paragraphs: blank-line separated chunks of at least 30 characters
//!
//! If every strategy declines, the whole text becomes a single `Syllabus`
//! topic. Extraction never fails; it only degrades to coarser rules.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{DERIVED_TITLE_MAX_CHARS, TITLE_MAX_CHARS, Topic, truncate_chars};

/// Chunks shorter than this (in characters) are treated as noise by the
/// paragraph strategy.
const MIN_PARAGRAPH_CHARS: usize = 30;

/// Title of the single topic produced when no strategy matches.
const FALLBACK_TITLE: &str = "Syllabus";

static CHAPTER_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^chapter\s+\d+\b.*$").unwrap());

static HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^chapter\s+\d+\b").unwrap());

static INLINE_CHAPTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+chapter\s+\d+:").unwrap());

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

type Strategy = fn(&str) -> Option<Vec<Topic>>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("manual_list", manual_list),
    ("chapter_headings", chapter_headings),
    ("inline_chapters", inline_chapters),
    ("paragraphs", paragraphs),
];

/// Turn raw text into an ordered sequence of topics.
///
/// Empty (or whitespace-only) input yields an empty vector; callers must
/// treat that as "nothing to plan". Any other input yields at least one
/// topic.
pub fn extract_topics(text: &str) -> Vec<Topic> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text = normalize_line_endings(text);

    for (name, strategy) in STRATEGIES {
        if let Some(topics) = strategy(&text) {
            debug!(strategy = *name, topics = topics.len(), "topic extraction matched");
            return topics;
        }
    }

    debug!(strategy = "fallback", "no extraction strategy matched");
    let length = text.chars().count();
    vec![Topic::new(FALLBACK_TITLE, text, length)]
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Two or more short lines: each line is one topic.
///
/// A list that opens with a `Chapter <n>` heading and then mixes in other
/// lines is a chaptered syllabus with body text, so it is left for the
/// heading strategy. A heading further down an ordinary list stays a topic.
fn manual_list(text: &str) -> Option<Vec<Topic>> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 2 || lines.iter().any(|l| l.chars().count() >= TITLE_MAX_CHARS) {
        return None;
    }

    let opens_with_heading = HEADING_PREFIX.is_match(lines[0]);
    if opens_with_heading && !lines.iter().all(|l| HEADING_PREFIX.is_match(l)) {
        return None;
    }

    Some(lines.into_iter().map(Topic::from_line).collect())
}

/// Split at every line starting with `Chapter <n>`.
///
/// Text before the first heading is discarded. A topic's weight is the
/// length of its body, not of its heading.
fn chapter_headings(text: &str) -> Option<Vec<Topic>> {
    let headings: Vec<_> = CHAPTER_HEADING.find_iter(text).collect();
    if headings.is_empty() {
        return None;
    }

    let topics = headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let end = headings.get(i + 1).map_or(text.len(), |next| next.start());
            let body = &text[heading.end()..end];
            Topic::new(heading.as_str().trim(), body.trim(), body.chars().count())
        })
        .collect();

    Some(topics)
}

/// Split on `chapter <n>:` markers that appear mid-text.
fn inline_chapters(text: &str) -> Option<Vec<Topic>> {
    let parts: Vec<&str> = INLINE_CHAPTER.split(text).collect();
    if parts.len() < 2 {
        return None;
    }

    let topics = parts[1..]
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let number = i + 1;
            let content = part.trim();
            let first_line = content.split('\n').next().unwrap_or_default();
            let derived = truncate_chars(first_line, DERIVED_TITLE_MAX_CHARS);
            let derived = derived.trim();
            let title = if derived.is_empty() {
                format!("Chapter {number}")
            } else {
                format!("Chapter {number}: {derived}")
            };
            Topic::new(title, content, part.chars().count())
        })
        .collect();

    Some(topics)
}

/// Blank-line separated chunks, ignoring short noise chunks.
fn paragraphs(text: &str) -> Option<Vec<Topic>> {
    let topics: Vec<Topic> = PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|chunk| chunk.chars().count() >= MIN_PARAGRAPH_CHARS)
        .map(|chunk| {
            let first_line = chunk.split('\n').next().unwrap_or_default();
            Topic::new(
                truncate_chars(first_line, DERIVED_TITLE_MAX_CHARS),
                chunk,
                chunk.chars().count(),
            )
        })
        .collect();

    (!topics.is_empty()).then_some(topics)
}
