//! Topics: the unit of study material fed to the plan allocator.

mod extract;

pub use extract::extract_topics;

use serde::{Deserialize, Serialize};

/// Maximum display length (in characters) of a topic title.
pub const TITLE_MAX_CHARS: usize = 120;

/// Maximum length (in characters) of a title derived from a chunk's first line.
pub const DERIVED_TITLE_MAX_CHARS: usize = 80;

/// A unit of study material with a display title and a proportional weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Display name, at most [`TITLE_MAX_CHARS`] characters.
    pub title: String,
    /// Raw extracted text. Empty for manually listed topics.
    #[serde(default)]
    pub content: String,
    /// Character count used as the topic's weight during allocation.
    pub length: usize,
    /// Study minutes assigned by the allocator. `None` until a plan is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl Topic {
    /// Create a topic with the given title, content and weight.
    pub fn new(title: impl Into<String>, content: impl Into<String>, length: usize) -> Self {
        Self {
            title: truncate_chars(&title.into(), TITLE_MAX_CHARS),
            content: content.into(),
            length,
            estimated_minutes: None,
        }
    }

    /// Create a topic from a single line of a manual topic list.
    ///
    /// The weight is the line's character count and the content is empty.
    pub fn from_line(line: &str) -> Self {
        Self::new(line, String::new(), line.chars().count())
    }
}

/// Return at most `max` characters of `s`.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
