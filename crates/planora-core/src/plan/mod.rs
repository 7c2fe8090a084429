//! Study-plan allocation: turns topics and a time budget into a calendar of
//! days with minute-level allocations.
//!
//! The allocator is a pure function of its inputs. Identical topics and
//! requests always produce identical plans.

mod allocate;
mod budget;

pub use allocate::{generate_plan, review_positions};
pub use budget::{Budget, estimate_minutes};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::topic::Topic;

/// Upper bound applied to an explicit review-day fraction.
pub const MAX_REVIEW_DAY_FRACTION: f64 = 0.30;

// ---------------------------------------------------------------------------
// Exam type
// ---------------------------------------------------------------------------

/// Kind of exam the plan prepares for. Drives review share and day ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    /// Cumulative exam: topics are spread round-robin across the plan.
    #[default]
    Final,
    /// Regular test: large topics are front-loaded onto the earliest days.
    RegularTest,
}

impl ExamType {
    /// Parse an exam type, treating anything unrecognized as [`ExamType::Final`].
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Review fraction used when the request does not override it.
    pub fn default_review_fraction(self) -> f64 {
        match self {
            Self::Final => 0.08,
            Self::RegularTest => 0.04,
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Final => "final",
            Self::RegularTest => "regular_test",
        };
        f.write_str(s)
    }
}

impl FromStr for ExamType {
    type Err = ExamTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "final" => Ok(Self::Final),
            "regular_test" => Ok(Self::RegularTest),
            other => Err(ExamTypeParseError(other.to_owned())),
        }
    }
}

impl<'de> Deserialize<'de> for ExamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_str_lenient(&raw))
    }
}

/// Error returned when parsing an invalid [`ExamType`] string.
#[derive(Debug, Clone, Error)]
#[error("invalid exam type: {0:?} (expected final or regular_test)")]
pub struct ExamTypeParseError(pub String);

// ---------------------------------------------------------------------------
// Plan records
// ---------------------------------------------------------------------------

/// A placement of all or part of a topic's minutes into one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAllocation {
    /// Topic title, suffixed `(Part N)` when the topic spans several placements.
    pub title: String,
    /// Minutes assigned on this day. Always positive.
    pub estimated_minutes: u32,
}

/// One calendar slot in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based ordinal.
    pub day: u32,
    pub topics: Vec<TopicAllocation>,
    /// Sum of the allocations' minutes; never above the daily capacity.
    pub total_minutes: u32,
    pub is_review: bool,
    pub daily_summary: String,
}

impl Day {
    fn empty(day: u32) -> Self {
        Self {
            day,
            topics: Vec::new(),
            total_minutes: 0,
            is_review: false,
            daily_summary: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Precondition violations detected by [`PlanRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanRequestError {
    #[error("plan length must be at least 1 day")]
    ZeroPlanLength,

    #[error("hours per day must be a positive number, got {0}")]
    InvalidHoursPerDay(f64),

    #[error("no topics to plan (the syllabus produced no content)")]
    NoTopics,
}

/// Time budget and strategy for one plan generation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    /// Number of days in the plan.
    pub plan_length: u32,
    pub hours_per_day: f64,
    pub exam_type: ExamType,
    /// Optional override of the review share, clamped to
    /// `[0, MAX_REVIEW_DAY_FRACTION]`. Non-finite values count as absent.
    pub review_day_fraction: Option<f64>,
}

impl PlanRequest {
    pub fn new(plan_length: u32, hours_per_day: f64, exam_type: ExamType) -> Self {
        Self {
            plan_length,
            hours_per_day,
            exam_type,
            review_day_fraction: None,
        }
    }

    pub fn with_review_day_fraction(mut self, fraction: Option<f64>) -> Self {
        self.review_day_fraction = fraction;
        self
    }

    /// Minutes a single day can hold: `floor(hours_per_day * 60)`.
    pub fn capacity(&self) -> u32 {
        let minutes = (self.hours_per_day * 60.0).floor();
        if minutes.is_finite() && minutes > 0.0 {
            minutes as u32
        } else {
            0
        }
    }

    /// Review fraction in effect: the clamped override, or the exam-type default.
    pub fn effective_review_fraction(&self) -> f64 {
        match self.review_day_fraction.filter(|f| f.is_finite()) {
            Some(fraction) => fraction.clamp(0.0, MAX_REVIEW_DAY_FRACTION),
            None => self.exam_type.default_review_fraction(),
        }
    }

    /// Check the caller-side preconditions of [`generate_plan`].
    pub fn validate(&self, topics: &[Topic]) -> Result<(), PlanRequestError> {
        if self.plan_length == 0 {
            return Err(PlanRequestError::ZeroPlanLength);
        }
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(PlanRequestError::InvalidHoursPerDay(self.hours_per_day));
        }
        if topics.is_empty() {
            return Err(PlanRequestError::NoTopics);
        }
        Ok(())
    }
}
