//! Core logic for planora: syllabus topic extraction, study-plan allocation,
//! rescheduling, and plan export.
//!
//! The two central entry points are [`topic::extract_topics`] and
//! [`plan::generate_plan`]. Both are pure and deterministic; everything else
//! in this crate is glue around them.

pub mod difficulty;
pub mod document;
pub mod export;
pub mod ingest;
pub mod plan;
pub mod reschedule;
pub mod topic;

pub use document::{DocumentError, PlanDocument, PlanOptions};
pub use plan::{Day, ExamType, PlanRequest, PlanRequestError, TopicAllocation, generate_plan};
pub use topic::{Topic, extract_topics};
