//! Keyword heuristics for topic difficulty and standalone effort estimates.
//!
//! Difficulty is a 1..=5 score predicted from hard/easy keywords. It feeds
//! two optional features: a per-topic effort estimate independent of any
//! time budget, and [`weight_by_difficulty`], which scales topic weights
//! before allocation so harder material receives a larger share.

use std::fmt;

use crate::topic::Topic;

const HARD_KEYWORDS: &[&str] = &["quantum", "complex", "advanced", "mechanism", "orbital", "entropy"];
const EASY_KEYWORDS: &[&str] = &["intro", "basic", "simple", "easy", "overview", "fundamentals"];

/// Default study time per 100 characters of material, in hours.
pub const DEFAULT_HOURS_PER_100_CHARS: f64 = 2.0;

/// Lower bound of [`estimate_time`].
const MIN_ESTIMATE_MINUTES: u32 = 10;

/// Difficulty score from 1 (easiest) to 5 (hardest).
/// Only constructible through [`Difficulty::new`], which keeps the level in
/// range for [`Difficulty::factor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASIEST: Self = Self(1);
    pub const MEDIUM: Self = Self(3);
    pub const HARDEST: Self = Self(5);

    /// Build a difficulty, clamping into `1..=5`.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 5))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Effort multiplier: 1.0 at level 1, +0.3 per level above.
    pub fn factor(self) -> f64 {
        1.0 + f64::from(self.0 - 1) * 0.3
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// Predict a topic's difficulty from keywords in its text.
///
/// More than one hard keyword scores 5, one scores 4. Without hard keywords,
/// more than one easy keyword scores 1 and one scores 2. Everything else is 3.
pub fn predict_difficulty(text: &str) -> Difficulty {
    let lower = text.to_lowercase();
    let hard = HARD_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    let easy = EASY_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();

    match (hard, easy) {
        (h, _) if h > 1 => Difficulty::HARDEST,
        (1, _) => Difficulty::new(4),
        (_, e) if e > 1 => Difficulty::EASIEST,
        (_, 1) => Difficulty::new(2),
        _ => Difficulty::MEDIUM,
    }
}

/// Difficulty of a topic, judged from its title and content together.
pub fn topic_difficulty(topic: &Topic) -> Difficulty {
    predict_difficulty(&format!("{} {}", topic.title, topic.content))
}

/// Estimate study minutes for material of `length` characters.
///
/// `minutes = floor(length / 100 * hours_per_100_chars * 60 * factor)`,
/// never below 10.
pub fn estimate_time(length: usize, difficulty: Difficulty, hours_per_100_chars: f64) -> u32 {
    let base = length as f64 / 100.0 * hours_per_100_chars * 60.0;
    let minutes = (base * difficulty.factor()).floor();
    if minutes.is_finite() && minutes > 0.0 {
        (minutes as u32).max(MIN_ESTIMATE_MINUTES)
    } else {
        MIN_ESTIMATE_MINUTES
    }
}

/// Scale every topic's weight by its difficulty factor, rounding to the
/// nearest character.
pub fn weight_by_difficulty(topics: &mut [Topic]) {
    for topic in topics {
        let factor = topic_difficulty(topic).factor();
        topic.length = (topic.length as f64 * factor).round() as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_keywords_dominate() {
        assert_eq!(predict_difficulty("Quantum mechanism basics").level(), 5);
        assert_eq!(predict_difficulty("Advanced basics").level(), 4);
    }

    #[test]
    fn easy_keywords_lower_difficulty() {
        assert_eq!(predict_difficulty("Intro and overview").level(), 1);
        assert_eq!(predict_difficulty("A simple start").level(), 2);
        assert_eq!(predict_difficulty("Stoichiometry").level(), 3);
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        // "Introduction" contains "intro"; "ENTROPY" matches "entropy".
        assert_eq!(predict_difficulty("Introduction").level(), 2);
        assert_eq!(predict_difficulty("ENTROPY").level(), 4);
    }

    #[test]
    fn difficulty_is_clamped() {
        assert_eq!(Difficulty::new(0).level(), 1);
        assert_eq!(Difficulty::new(9).level(), 5);
        assert_eq!(Difficulty::new(3).to_string(), "3/5");
    }

    #[test]
    fn out_of_range_levels_scale_like_their_clamped_level() {
        assert_eq!(Difficulty::new(0).factor(), 1.0);
        assert_eq!(Difficulty::new(u8::MAX).factor(), Difficulty::HARDEST.factor());
    }

    #[test]
    fn estimate_time_scales_with_length_and_difficulty() {
        // 100 chars * 2h/100 chars = 120 min at level 1.
        assert_eq!(estimate_time(100, Difficulty::EASIEST, 2.0), 120);
        // Level 5 multiplies by 2.2.
        assert_eq!(estimate_time(100, Difficulty::HARDEST, 2.0), 264);
    }

    #[test]
    fn estimate_time_has_a_floor() {
        assert_eq!(estimate_time(1, Difficulty::EASIEST, 2.0), 10);
        assert_eq!(estimate_time(0, Difficulty::MEDIUM, 2.0), 10);
    }

    #[test]
    fn weighting_increases_hard_topic_share() {
        let mut topics = vec![
            Topic::new("Intro overview", "", 100),
            Topic::new("Quantum orbital theory", "", 100),
        ];
        weight_by_difficulty(&mut topics);
        assert_eq!(topics[0].length, 100);
        assert_eq!(topics[1].length, 220);
    }
}
