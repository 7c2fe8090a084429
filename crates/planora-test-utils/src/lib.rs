//! Shared test utilities for planora integration tests.
//!
//! Provides sample syllabus texts, topic and request builders, and
//! [`assert_plan_invariants`], which checks the structural guarantees every
//! generated plan must satisfy.

use std::collections::BTreeMap;

use planora_core::plan::{Budget, Day, ExamType, PlanRequest};
use planora_core::topic::Topic;

/// A short topic list, one topic per line.
pub const TOPIC_LIST: &str = "Atomic structure\nChemical bonding\nStoichiometry\nAcids and bases";

/// A syllabus with `Chapter <n>` headings followed by body text.
pub const CHAPTERED_SYLLABUS: &str = "\
Course: General Chemistry
Chapter 1: Introduction to Matter
States of matter, mixtures and basic measurements in the laboratory.

Chapter 2: Quantum Orbitals
Quantum numbers, orbital shapes and the electron configuration of atoms, with many worked examples from the periodic table.

Chapter 3: Thermodynamics
Enthalpy, entropy and free energy. Spontaneity of reactions.
";

/// Free prose with blank-line separated paragraphs and no headings.
pub const PARAGRAPH_SYLLABUS: &str = "\
This course introduces the fundamentals of organic chemistry and the naming of compounds in a long opening sentence that runs past the manual list limit of one hundred and twenty characters.

Reaction mechanisms are covered next, including substitution and elimination.

Finally, spectroscopy methods are used to identify unknown compounds.
";

/// Build a topic with no body text.
pub fn topic(title: &str, length: usize) -> Topic {
    Topic::new(title, "", length)
}

pub fn request(plan_length: u32, hours_per_day: f64, exam_type: ExamType) -> PlanRequest {
    PlanRequest::new(plan_length, hours_per_day, exam_type)
}

/// Strip a trailing ` (Part N)` from an allocation title.
pub fn base_title(title: &str) -> &str {
    match title.rfind(" (Part ") {
        Some(at) if title.ends_with(')') => &title[..at],
        _ => title,
    }
}

/// Total allocated minutes per topic, with split parts merged.
pub fn minutes_by_topic(days: &[Day]) -> BTreeMap<String, u64> {
    let mut totals = BTreeMap::new();
    for allocation in days.iter().flat_map(|d| &d.topics) {
        *totals
            .entry(base_title(&allocation.title).to_string())
            .or_insert(0) += u64::from(allocation.estimated_minutes);
    }
    totals
}

/// Index of the first day holding any allocation of `title`.
pub fn first_day_of(days: &[Day], title: &str) -> Option<usize> {
    days.iter()
        .position(|d| d.topics.iter().any(|a| base_title(&a.title) == title))
}

/// Assert the structural guarantees of a generated plan.
///
/// Checks day count and numbering, per-day totals against capacity,
/// positive allocations, the review-day count, and that review days hold
/// no study allocations.
pub fn assert_plan_invariants(days: &[Day], request: &PlanRequest) {
    let budget = Budget::compute(request);

    assert_eq!(days.len(), request.plan_length as usize, "day count");
    for (i, day) in days.iter().enumerate() {
        assert_eq!(day.day as usize, i + 1, "day numbering");

        let sum: u32 = day.topics.iter().map(|a| a.estimated_minutes).sum();
        assert_eq!(day.total_minutes, sum, "day {} total", day.day);
        assert!(
            day.total_minutes <= budget.capacity,
            "day {} holds {} minutes, capacity {}",
            day.day,
            day.total_minutes,
            budget.capacity
        );
        assert!(
            day.topics.iter().all(|a| a.estimated_minutes > 0),
            "day {} has an empty allocation",
            day.day
        );
        assert!(!day.daily_summary.is_empty(), "day {} summary", day.day);
        if day.is_review {
            assert!(day.topics.is_empty(), "review day {} has topics", day.day);
        }
    }

    let review = days.iter().filter(|d| d.is_review).count();
    if request.plan_length > 1 {
        assert!(review >= 1, "multi-day plan without a review day");
        assert!(review < days.len(), "every day is a review day");
    } else {
        assert_eq!(review, 0, "single-day plan with a review day");
    }
}
