//! Integration tests for topic extraction and plan allocation.
//!
//! Runs the extractor and allocator together over sample syllabi and a grid
//! of requests, checking the properties every plan must hold.

use planora_core::plan::{Budget, review_positions};
use planora_core::{ExamType, PlanRequest, extract_topics, generate_plan};
use planora_test_utils::{
    CHAPTERED_SYLLABUS, PARAGRAPH_SYLLABUS, TOPIC_LIST, assert_plan_invariants, first_day_of,
    minutes_by_topic, request, topic,
};

// -----------------------------------------------------------------------
// Structural properties
// -----------------------------------------------------------------------

#[test]
fn every_request_yields_a_well_formed_plan() {
    for text in [TOPIC_LIST, CHAPTERED_SYLLABUS, PARAGRAPH_SYLLABUS] {
        for plan_length in [1, 2, 3, 7, 14, 30] {
            for hours in [0.5, 1.0, 2.0, 3.5] {
                for exam in [ExamType::Final, ExamType::RegularTest] {
                    let req = request(plan_length, hours, exam);
                    let mut topics = extract_topics(text);
                    let days = generate_plan(&mut topics, &req);
                    assert_plan_invariants(&days, &req);
                }
            }
        }
    }
}

#[test]
fn allocated_minutes_match_topic_estimates() {
    for plan_length in [1, 3, 7, 14] {
        for exam in [ExamType::Final, ExamType::RegularTest] {
            let req = request(plan_length, 2.0, exam);
            let mut topics = extract_topics(CHAPTERED_SYLLABUS);
            let days = generate_plan(&mut topics, &req);

            let estimated: u32 = topics.iter().filter_map(|t| t.estimated_minutes).sum();
            let budget = Budget::compute(&req);
            let study_capacity = (plan_length - budget.review_days) * budget.capacity;
            let placed = minutes_by_topic(&days);
            if estimated > study_capacity {
                // Rounding drift past a full schedule: only the overflow is dropped.
                let total: u64 = placed.values().sum();
                assert_eq!(total, u64::from(study_capacity));
                continue;
            }

            for t in &topics {
                assert_eq!(
                    placed.get(&t.title).copied(),
                    t.estimated_minutes.map(u64::from),
                    "minutes for {} in a {plan_length}-day {exam} plan",
                    t.title
                );
            }
        }
    }
}

#[test]
fn review_days_sit_at_even_positions() {
    let mut topics = extract_topics(TOPIC_LIST);
    let days = generate_plan(&mut topics, &request(30, 2.0, ExamType::Final));
    let review: Vec<u32> = days.iter().filter(|d| d.is_review).map(|d| d.day).collect();
    // floor(30 * 0.08) = 2 review days, at round(10) and round(20).
    assert_eq!(review, [10, 20]);
    assert_eq!(review_positions(30, 2), [9, 19]);
}

#[test]
fn single_day_plan_has_no_review_day() {
    let req = request(1, 2.0, ExamType::Final);
    let mut topics = extract_topics(TOPIC_LIST);
    let days = generate_plan(&mut topics, &req);
    assert_eq!(days.len(), 1);
    assert!(!days[0].is_review);
    assert_eq!(days[0].total_minutes, 120);
}

#[test]
fn generation_is_deterministic() {
    let req = request(14, 1.5, ExamType::Final);
    let mut first_topics = extract_topics(CHAPTERED_SYLLABUS);
    let mut second_topics = extract_topics(CHAPTERED_SYLLABUS);
    assert_eq!(
        generate_plan(&mut first_topics, &req),
        generate_plan(&mut second_topics, &req)
    );
    assert_eq!(first_topics, second_topics);
}

// -----------------------------------------------------------------------
// Extraction scenarios
// -----------------------------------------------------------------------

#[test]
fn manual_list_becomes_one_topic_per_line() {
    let topics = extract_topics("Topic A\nTopic B\nTopic C");
    let titles: Vec<&str> = topics.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Topic A", "Topic B", "Topic C"]);
}

#[test]
fn chaptered_syllabus_splits_by_heading() {
    let topics = extract_topics("Chapter 1: Intro\nBasics.\n\nChapter 2: Advanced\nHard stuff.");
    assert_eq!(topics.len(), 2);
    assert!(topics[0].title.starts_with("Chapter 1"));
    assert!(topics[1].title.starts_with("Chapter 2"));
}

#[test]
fn sample_syllabi_extract_expected_topic_counts() {
    assert_eq!(extract_topics(TOPIC_LIST).len(), 4);
    // The course line before the first chapter is dropped.
    let chapters = extract_topics(CHAPTERED_SYLLABUS);
    assert_eq!(chapters.len(), 3);
    assert!(chapters.iter().all(|t| t.title.starts_with("Chapter")));
    assert_eq!(extract_topics(PARAGRAPH_SYLLABUS).len(), 3);
}

#[test]
fn empty_input_has_no_topics() {
    assert!(extract_topics("").is_empty());
    assert!(extract_topics(" \n\t\n").is_empty());
}

// -----------------------------------------------------------------------
// Placement scenarios
// -----------------------------------------------------------------------

#[test]
fn large_topic_is_split_across_study_days() {
    let req = request(3, 1.0, ExamType::Final);
    let mut topics = vec![topic("BigTopic", 5000)];
    let days = generate_plan(&mut topics, &req);

    // One review day in the middle; the 120 topic minutes fill days 1 and 3.
    assert!(days[1].is_review);
    assert_eq!(topics[0].estimated_minutes, Some(120));
    assert_eq!(days[0].topics[0].title, "BigTopic (Part 1)");
    assert_eq!(days[0].topics[0].estimated_minutes, 60);
    assert_eq!(days[2].topics[0].title, "BigTopic (Part 2)");
    assert_eq!(days[2].topics[0].estimated_minutes, 60);
    assert_plan_invariants(&days, &req);
}

#[test]
fn regular_test_front_loads_large_topics() {
    let mut topics = vec![topic("A", 10), topic("B", 30)];
    let days = generate_plan(&mut topics, &request(5, 1.0, ExamType::RegularTest));
    assert_eq!(first_day_of(&days, "B"), Some(0));
    assert_eq!(first_day_of(&days, "A"), Some(4));
}

#[test]
fn final_exam_starts_topics_in_input_order() {
    let mut topics = vec![topic("A", 10), topic("B", 30)];
    let days = generate_plan(&mut topics, &request(5, 1.0, ExamType::Final));
    assert_eq!(first_day_of(&days, "A"), Some(0));
    // B starts one study day later, skipping the review day at index 1.
    assert_eq!(first_day_of(&days, "B"), Some(2));
}

#[test]
fn many_topics_respect_capacity() {
    let mut topics: Vec<_> = (0..40)
        .map(|i| topic(&format!("Topic {i}"), 10 + i * 7))
        .collect();
    let req = PlanRequest::new(5, 0.5, ExamType::RegularTest);
    let days = generate_plan(&mut topics, &req);
    assert_plan_invariants(&days, &req);
}
