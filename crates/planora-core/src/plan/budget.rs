//! Capacity, review reservation and per-topic minute estimation.

use tracing::{debug, warn};

use super::PlanRequest;
use crate::topic::Topic;

/// Floor applied to a topic's proportional estimate.
const MIN_ESTIMATE_MINUTES: u32 = 5;

/// Floor applied to a topic's estimate after rescaling for rounding drift.
const MIN_RESCALED_MINUTES: u32 = 3;

/// Minute budget derived from a [`PlanRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Minutes one day can hold.
    pub capacity: u32,
    /// `plan_length * capacity`.
    pub total_capacity: u32,
    /// Number of days flagged for review.
    pub review_days: u32,
    /// Minutes held back from topic study.
    pub reserved_for_review: u32,
    /// Minutes distributed across topics.
    pub topic_capacity: u32,
}

impl Budget {
    /// Compute capacity and review reservation for a request.
    ///
    /// Multi-day plans always get at least one review day and always keep at
    /// least one study day. The reservation never exceeds what the review days
    /// can hold, and the topic budget never exceeds what the study days can
    /// hold.
    pub fn compute(request: &PlanRequest) -> Self {
        let capacity = request.capacity();
        let plan_length = request.plan_length;
        let total_capacity = plan_length.saturating_mul(capacity);
        let fraction = request.effective_review_fraction();

        let review_days = if plan_length <= 1 {
            0
        } else {
            let by_fraction = (f64::from(plan_length) * fraction).floor() as u32;
            by_fraction.max(1).min(plan_length - 1)
        };

        let reserved_for_review = ((f64::from(total_capacity) * fraction).floor() as u32)
            .min(review_days.saturating_mul(capacity));

        // Without the study-day cap, `total_capacity - reserved_for_review`
        // can exceed what the study days hold: 7 days at 1h for a regular
        // test gives 404 minutes against 360 of study time.
        let study_capacity = (plan_length - review_days).saturating_mul(capacity);
        let topic_capacity = total_capacity
            .saturating_sub(reserved_for_review)
            .min(study_capacity);

        debug!(
            capacity,
            total_capacity,
            review_days,
            reserved_for_review,
            topic_capacity,
            "computed plan budget"
        );

        Self {
            capacity,
            total_capacity,
            review_days,
            reserved_for_review,
            topic_capacity,
        }
    }
}

/// Estimate study minutes per topic, proportional to topic length.
///
/// Each estimate is `max(5, round(length / total_length * topic_capacity))`.
/// If rounding pushes the sum above `topic_capacity`, every estimate is
/// rescaled by `topic_capacity / sum` and floored at 3. For many tiny topics
/// on a small budget the floors can still leave the sum slightly above
/// `topic_capacity`; that drift is kept and logged.
///
/// Returns one estimate per topic, in input order.
pub fn estimate_minutes(topics: &[Topic], topic_capacity: u32) -> Vec<u32> {
    let total_length = topics.iter().map(|t| t.length).sum::<usize>().max(1) as f64;
    let budget = f64::from(topic_capacity);

    let mut minutes: Vec<u32> = topics
        .iter()
        .map(|t| {
            let share = t.length as f64 / total_length * budget;
            (share.round_ties_even() as u32).max(MIN_ESTIMATE_MINUTES)
        })
        .collect();

    let sum = total(&minutes);
    if sum > u64::from(topic_capacity) {
        let scale = budget / sum as f64;
        for m in &mut minutes {
            *m = ((f64::from(*m) * scale).round_ties_even() as u32).max(MIN_RESCALED_MINUTES);
        }

        let rescaled = total(&minutes);
        if rescaled > u64::from(topic_capacity) {
            warn!(
                rescaled,
                topic_capacity,
                topics = topics.len(),
                "topic estimates exceed budget after rescaling"
            );
        }
    }

    minutes
}

fn total(minutes: &[u32]) -> u64 {
    minutes.iter().map(|&m| u64::from(m)).sum()
}
