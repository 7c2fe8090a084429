//! The plan document: a generated plan together with the settings that
//! produced it, in the JSON shape exchanged with exporters and storage.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::difficulty::weight_by_difficulty;
use crate::plan::{Day, ExamType, PlanRequest, PlanRequestError, generate_plan};
use crate::topic::{Topic, extract_topics};

/// Default course label when none is given.
pub const DEFAULT_COURSE_TYPE: &str = "General";

/// Errors reading or writing a plan document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read plan document {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write plan document {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid plan document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render PDF: {0}")]
    Pdf(String),
}

/// Everything needed to turn syllabus text into a [`PlanDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    pub request: PlanRequest,
    pub exam_date: Option<NaiveDate>,
    pub course_type: String,
    /// Scale topic weights by predicted difficulty before allocation.
    pub weight_by_difficulty: bool,
}

impl PlanOptions {
    pub fn new(request: PlanRequest) -> Self {
        Self {
            request,
            exam_date: None,
            course_type: DEFAULT_COURSE_TYPE.to_string(),
            weight_by_difficulty: false,
        }
    }
}

/// A generated plan and the settings it was generated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(default)]
    pub exam_date: Option<NaiveDate>,
    #[serde(default)]
    pub exam_type: ExamType,
    pub plan_length: u32,
    pub hours_per_day: f64,
    #[serde(default = "default_course_type")]
    pub course_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_day_fraction: Option<f64>,
    pub topics_count: usize,
    pub plan: Vec<Day>,
}

fn default_course_type() -> String {
    DEFAULT_COURSE_TYPE.to_string()
}

impl PlanDocument {
    /// Run the full pipeline: extract topics from `text`, optionally weight
    /// them by difficulty, and allocate them.
    ///
    /// Fails when the request is invalid or the text yields no topics.
    pub fn generate(text: &str, options: &PlanOptions) -> Result<Self, PlanRequestError> {
        let topics = extract_topics(text);
        Self::from_topics(topics, options)
    }

    /// Allocate an already-extracted topic list.
    pub fn from_topics(
        mut topics: Vec<Topic>,
        options: &PlanOptions,
    ) -> Result<Self, PlanRequestError> {
        options.request.validate(&topics)?;

        if options.weight_by_difficulty {
            weight_by_difficulty(&mut topics);
        }

        let plan = generate_plan(&mut topics, &options.request);
        debug!(topics = topics.len(), days = plan.len(), "built plan document");

        Ok(Self {
            exam_date: options.exam_date,
            exam_type: options.request.exam_type,
            plan_length: options.request.plan_length,
            hours_per_day: options.request.hours_per_day,
            course_type: options.course_type.clone(),
            review_day_fraction: options.request.review_day_fraction,
            topics_count: topics.len(),
            plan,
        })
    }

    /// The request this document was generated from.
    pub fn request(&self) -> PlanRequest {
        PlanRequest::new(self.plan_length, self.hours_per_day, self.exam_type)
            .with_review_day_fraction(self.review_day_fraction)
    }

    /// Sum of allocated minutes across all days.
    pub fn total_minutes(&self) -> u64 {
        self.plan.iter().map(|d| u64::from(d.total_minutes)).sum()
    }

    pub fn review_day_count(&self) -> usize {
        self.plan.iter().filter(|d| d.is_review).count()
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| DocumentError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read a document previously written by [`PlanDocument::save`].
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let json = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
