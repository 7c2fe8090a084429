//! Topic-to-day placement and the public [`generate_plan`] entry point.

use tracing::info;

use super::budget::{Budget, estimate_minutes};
use super::{Day, ExamType, PlanRequest, TopicAllocation};
use crate::topic::Topic;

const REVIEW_SUMMARY: &str = "Review day: revisit previous topics and do practice questions.";
const LIGHT_SUMMARY: &str = "Light day: review notes or rest.";

/// Number of topic titles quoted in a study day's summary.
const SUMMARY_TITLES: usize = 2;

/// Generate a day-by-day plan for `topics`.
///
/// Sets each topic's `estimated_minutes` and returns exactly
/// `request.plan_length` days numbered from 1. No day ever holds more than
/// `request.capacity()` minutes.
///
/// Callers should run [`PlanRequest::validate`] first; this function does not
/// fail, but an empty topic list or zero-length plan yields an empty or idle
/// schedule.
pub fn generate_plan(topics: &mut [Topic], request: &PlanRequest) -> Vec<Day> {
    let budget = Budget::compute(request);

    let estimates = estimate_minutes(topics, budget.topic_capacity);
    for (topic, minutes) in topics.iter_mut().zip(&estimates) {
        topic.estimated_minutes = Some(*minutes);
    }

    let mut days: Vec<Day> = (1..=request.plan_length).map(Day::empty).collect();
    for position in review_positions(request.plan_length, budget.review_days) {
        days[position].is_review = true;
    }

    let study_days = study_day_indices(&days);
    match request.exam_type {
        ExamType::RegularTest => {
            // Largest topics first so they claim the earliest days.
            let mut by_size: Vec<&Topic> = topics.iter().collect();
            by_size.sort_by(|a, b| b.length.cmp(&a.length));
            for topic in by_size {
                place_minutes(&mut days, budget.capacity, topic, &study_days);
            }
        }
        ExamType::Final => {
            // Each topic starts one study day later than the previous one.
            for (i, topic) in topics.iter().enumerate() {
                let mut order = study_days.clone();
                if !order.is_empty() {
                    let shift = i % order.len();
                    order.rotate_left(shift);
                }
                place_minutes(&mut days, budget.capacity, topic, &order);
            }
        }
    }

    for day in &mut days {
        day.daily_summary = summarize(day);
    }

    info!(
        days = days.len(),
        review_days = budget.review_days,
        topics = topics.len(),
        topic_capacity = budget.topic_capacity,
        exam_type = %request.exam_type,
        "generated study plan"
    );

    days
}

/// Indices of the review days for a plan, spread evenly and deduplicated.
///
/// Position `i` (1-based) is `round(i * plan_length / (review_days + 1)) - 1`,
/// with halves rounded to even, clamped into the plan.
pub fn review_positions(plan_length: u32, review_days: u32) -> Vec<usize> {
    let mut positions = Vec::new();
    if plan_length == 0 {
        return positions;
    }

    let last = i64::from(plan_length) - 1;
    for i in 1..=review_days {
        let spot = f64::from(i) * f64::from(plan_length) / f64::from(review_days + 1);
        let position = (spot.round_ties_even() as i64 - 1).clamp(0, last) as usize;
        if !positions.contains(&position) {
            positions.push(position);
        }
    }
    positions
}

/// Non-review day indices in ascending order, or every index if all days
/// are review days.
fn study_day_indices(days: &[Day]) -> Vec<usize> {
    let study: Vec<usize> = days
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.is_review)
        .map(|(i, _)| i)
        .collect();

    if study.is_empty() {
        (0..days.len()).collect()
    } else {
        study
    }
}

/// Walk `order` repeatedly, filling each day's free capacity with the
/// topic's remaining minutes until they are all placed or a full pass
/// places nothing.
fn place_minutes(days: &mut [Day], capacity: u32, topic: &Topic, order: &[usize]) {
    let minutes = topic.estimated_minutes.unwrap_or_default();
    let mut remaining = minutes;
    let mut part = 1;

    while remaining > 0 {
        let mut placed_in_pass = false;

        for &index in order {
            let day = &mut days[index];
            let available = capacity.saturating_sub(day.total_minutes);
            if available == 0 {
                continue;
            }

            let take = remaining.min(available);
            let title = if minutes > take {
                format!("{} (Part {part})", topic.title)
            } else {
                topic.title.clone()
            };
            day.topics.push(TopicAllocation {
                title,
                estimated_minutes: take,
            });
            day.total_minutes += take;
            remaining -= take;
            part += 1;
            placed_in_pass = true;

            if remaining == 0 {
                break;
            }
        }

        if !placed_in_pass {
            break;
        }
    }
}

fn summarize(day: &Day) -> String {
    if day.is_review {
        return REVIEW_SUMMARY.to_string();
    }
    if day.topics.is_empty() {
        return LIGHT_SUMMARY.to_string();
    }

    let titles: Vec<&str> = day
        .topics
        .iter()
        .take(SUMMARY_TITLES)
        .map(|t| t.title.as_str())
        .collect();
    format!(
        "Today's goal: {} + practice problems ({} topics).",
        titles.join(", "),
        day.topics.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(title: &str, length: usize) -> Topic {
        Topic::new(title, "", length)
    }

    #[test]
    fn review_positions_are_evenly_spaced() {
        assert_eq!(review_positions(14, 1), vec![6]);
        assert_eq!(review_positions(30, 2), vec![9, 19]);
        assert!(review_positions(5, 0).is_empty());
    }

    #[test]
    fn review_positions_round_halves_to_even() {
        // 1 * 5 / 2 = 2.5 rounds to 2.
        assert_eq!(review_positions(5, 1), vec![1]);
        // 1 * 3 / 2 = 1.5 rounds to 2.
        assert_eq!(review_positions(3, 1), vec![1]);
    }

    #[test]
    fn review_positions_are_deduplicated_and_clamped() {
        let positions = review_positions(2, 3);
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn topic_that_fits_keeps_plain_title() {
        let mut days: Vec<Day> = (1..=2).map(Day::empty).collect();
        let mut t = topic("Acids", 10);
        t.estimated_minutes = Some(30);
        place_minutes(&mut days, 60, &t, &[0, 1]);
        assert_eq!(days[0].topics[0].title, "Acids");
        assert_eq!(days[0].total_minutes, 30);
        assert!(days[1].topics.is_empty());
    }

    #[test]
    fn oversized_topic_is_split_into_parts() {
        let mut days: Vec<Day> = (1..=3).map(Day::empty).collect();
        let mut t = topic("Kinetics", 10);
        t.estimated_minutes = Some(130);
        place_minutes(&mut days, 60, &t, &[0, 1, 2]);
        let titles: Vec<&str> = days
            .iter()
            .flat_map(|d| d.topics.iter().map(|a| a.title.as_str()))
            .collect();
        assert_eq!(
            titles,
            ["Kinetics (Part 1)", "Kinetics (Part 2)", "Kinetics (Part 3)"]
        );
        assert_eq!(days[2].total_minutes, 10);
    }

    #[test]
    fn placement_stops_when_no_capacity_is_left() {
        let mut days: Vec<Day> = (1..=1).map(Day::empty).collect();
        let mut t = topic("Overflow", 10);
        t.estimated_minutes = Some(500);
        place_minutes(&mut days, 60, &t, &[0]);
        assert_eq!(days[0].total_minutes, 60);
        assert_eq!(days[0].topics.len(), 1);
    }

    #[test]
    fn empty_day_order_places_nothing() {
        let mut days: Vec<Day> = (1..=2).map(Day::empty).collect();
        let mut t = topic("Nowhere", 10);
        t.estimated_minutes = Some(20);
        place_minutes(&mut days, 60, &t, &[]);
        assert!(days.iter().all(|d| d.topics.is_empty()));
    }

    #[test]
    fn summaries_cover_review_light_and_study_days() {
        let mut review = Day::empty(1);
        review.is_review = true;
        assert_eq!(summarize(&review), REVIEW_SUMMARY);

        assert_eq!(summarize(&Day::empty(2)), LIGHT_SUMMARY);

        let mut study = Day::empty(3);
        for title in ["A", "B", "C"] {
            study.topics.push(TopicAllocation {
                title: title.to_string(),
                estimated_minutes: 10,
            });
        }
        assert_eq!(
            summarize(&study),
            "Today's goal: A, B + practice problems (3 topics)."
        );
    }

    #[test]
    fn generate_plan_sets_estimates_on_every_topic() {
        let mut topics = vec![topic("A", 10), topic("B", 30)];
        let request = PlanRequest::new(4, 1.0, ExamType::Final);
        let days = generate_plan(&mut topics, &request);
        assert_eq!(days.len(), 4);
        assert!(topics.iter().all(|t| t.estimated_minutes.is_some()));
    }

    #[test]
    fn final_exam_staggers_topic_start_days() {
        // Day 2 is the review day; study days are 1, 3, 4 and 5.
        let mut topics: Vec<Topic> = ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|title| topic(title, 10))
            .collect();
        let days = generate_plan(&mut topics, &PlanRequest::new(5, 4.0, ExamType::Final));
        assert!(days[1].is_review);
        assert!(topics.iter().all(|t| t.estimated_minutes == Some(192)));

        let first_day = |title: &str| {
            days.iter()
                .find(|d| d.topics.iter().any(|a| a.title.starts_with(title)))
                .map(|d| d.day)
        };
        assert_eq!(first_day("A"), Some(1));
        assert_eq!(first_day("B"), Some(3));
        assert_eq!(first_day("C"), Some(4));
        assert_eq!(first_day("D"), Some(5));
        // The fifth topic wraps back to the first study day.
        assert_eq!(first_day("E"), Some(1));
        assert_eq!(days[0].topics[1].title, "E (Part 1)");
    }

    #[test]
    fn zero_length_plan_is_empty() {
        let mut topics = vec![topic("A", 10)];
        let days = generate_plan(&mut topics, &PlanRequest::new(0, 1.0, ExamType::Final));
        assert!(days.is_empty());
    }
}
