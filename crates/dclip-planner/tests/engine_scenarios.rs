//! End-to-end planning scenarios: aggregation through commitment.

use dclip_models::{ClipCandidate, PublisherId};
use dclip_planner::{
    CandidateAggregator, CommitStatus, PlannerConfig, PlanningEngine, PlaylistCommitter,
    PrioritySequencer,
};

fn clip(id: &str, publisher: &str, duration: f64, popularity: u64) -> ClipCandidate {
    ClipCandidate::new(id, publisher, duration)
        .with_locale("fr")
        .with_title(format!("clip {}", id))
        .with_popularity(popularity)
}

fn config(priority: &[&str], min_duration_seconds: f64, min_count: usize) -> PlannerConfig {
    PlannerConfig {
        accepted_locales: vec!["fr".to_string()],
        priority_publishers: priority.iter().map(|p| PublisherId::from(*p)).collect(),
        title_blacklist: Vec::new(),
        min_duration_seconds,
        min_count,
    }
}

#[test]
fn test_dedup_counts_duration_once() {
    let mut aggregator = CandidateAggregator::new();
    // Same clip reported by a topic query and a publisher query
    aggregator.ingest(vec![clip("dup", "X", 120.0, 10), clip("other", "X", 60.0, 5)]);
    aggregator.ingest(vec![clip("dup", "X", 120.0, 40)]);

    let pool = aggregator.snapshot();
    assert_eq!(pool.len(), 2);

    let engine = PlanningEngine::new(&config(&[], 1000.0, 1)).unwrap();
    let report = engine.plan(pool);

    assert_eq!(report.plan.len(), 2);
    assert_eq!(report.plan.total_duration_seconds(), 180.0);
    // Last sighting wins: popularity 40 puts "dup" first
    assert_eq!(report.plan.entries()[0].candidate().id().as_str(), "dup");
    assert_eq!(report.plan.entries()[0].candidate().popularity(), 40);
}

#[test]
fn test_offsets_are_prefix_sums() {
    let durations = [12.3, 45.6, 7.89, 30.0, 0.5, 61.25];
    let pool = durations
        .iter()
        .enumerate()
        .map(|(i, d)| clip(&format!("c{}", i), "X", *d, 100 - i as u64))
        .collect();

    let engine = PlanningEngine::new(&config(&[], 1.0e9, 1)).unwrap();
    let report = engine.plan(pool);
    let entries = report.plan.entries();

    assert_eq!(entries[0].start_offset_seconds(), 0.0);
    for k in 1..entries.len() {
        let expected: f64 = entries[..k].iter().map(|e| e.duration_seconds()).sum();
        assert_eq!(entries[k].start_offset_seconds(), expected);
    }
    assert!(report.plan.verify_offsets().is_ok());
}

#[test]
fn test_priority_ordering_a_then_b_then_rest() {
    let pool = vec![
        clip("c-hot", "C", 10.0, 10_000),
        clip("b-low", "B", 10.0, 5),
        clip("a-mid", "A", 10.0, 50),
        clip("b-high", "B", 10.0, 500),
        clip("a-top", "A", 10.0, 80),
        clip("c-cold", "C", 10.0, 1),
    ]
    .into_iter()
    .collect();

    let engine = PlanningEngine::new(&config(&["A", "B"], 1.0e9, 1)).unwrap();
    let report = engine.plan(pool);

    let publishers: Vec<_> = report
        .plan
        .entries()
        .iter()
        .map(|e| e.candidate().publisher_id().as_str())
        .collect();
    assert_eq!(publishers, vec!["A", "A", "B", "B", "C", "C"]);

    let ids: Vec<_> = report
        .plan
        .entries()
        .iter()
        .map(|e| e.candidate().id().as_str())
        .collect();
    assert_eq!(ids, vec!["a-top", "a-mid", "b-high", "b-low", "c-hot", "c-cold"]);
}

#[test]
fn test_threshold_satisfaction_and_minimality() {
    let durations = [33.0, 12.0, 71.0, 5.0, 44.0, 18.0, 90.0, 2.0];
    let candidates: Vec<_> = durations
        .iter()
        .enumerate()
        .map(|(i, d)| clip(&format!("c{}", i), "X", *d, 1000 - i as u64))
        .collect();
    let pool_total: f64 = durations.iter().sum();

    for min_count in 1..=durations.len() {
        for min_duration in [0.0, 10.0, 50.0, 100.0, 150.0, 200.0, pool_total] {
            let ordered = PrioritySequencer::default().order(&candidates.iter().cloned().collect());
            let outcome = PlaylistCommitter::new(min_duration, min_count).commit(ordered);
            let plan = &outcome.plan;

            // Pool can satisfy both thresholds, so the plan must
            assert_eq!(outcome.status, CommitStatus::Satisfied);
            assert!(plan.total_duration_seconds() >= min_duration);
            assert!(plan.len() >= min_count);

            // Dropping the last entry must break a threshold
            let without_last = plan.total_duration_seconds()
                - plan.entries().last().unwrap().duration_seconds();
            assert!(without_last < min_duration || plan.len() - 1 < min_count);
        }
    }
}

#[test]
fn test_scenario_single_publisher_600s_three_clips() {
    let pool = vec![
        clip("p400", "X", 400.0, 500),
        clip("p200", "X", 200.0, 400),
        clip("p100", "X", 100.0, 300),
        clip("p50", "X", 50.0, 200),
        clip("p20", "X", 20.0, 100),
    ]
    .into_iter()
    .collect();

    let engine = PlanningEngine::new(&config(&["X"], 600.0, 3)).unwrap();
    let report = engine.plan(pool);

    assert_eq!(report.status, CommitStatus::Satisfied);
    let ids: Vec<_> = report
        .plan
        .entries()
        .iter()
        .map(|e| e.candidate().id().as_str())
        .collect();
    assert_eq!(ids, vec!["p400", "p200", "p100"]);
    assert_eq!(report.plan.offsets(), vec![0.0, 400.0, 600.0]);
    assert_eq!(report.plan.total_duration_seconds(), 700.0);
}

#[test]
fn test_scenario_empty_pool() {
    let engine = PlanningEngine::new(&config(&["X"], 600.0, 3)).unwrap();
    let report = engine.plan(CandidateAggregator::new().snapshot());

    assert!(report.plan.is_empty());
    assert_eq!(report.status, CommitStatus::NothingToPublish);
}

#[test]
fn test_scenario_everything_filtered_is_empty_plan() {
    let pool = vec![ClipCandidate::new("x", "X", 30.0).with_locale("de")]
        .into_iter()
        .collect();
    let engine = PlanningEngine::new(&config(&[], 600.0, 3)).unwrap();
    let report = engine.plan(pool);

    assert!(report.plan.is_empty());
    assert_eq!(report.filter.locale_not_accepted, 1);
    assert_eq!(report.status, CommitStatus::NothingToPublish);
}

#[test]
fn test_scenario_shortfall_300s() {
    let pool = vec![
        clip("a", "X", 100.0, 3),
        clip("b", "Y", 150.0, 2),
        clip("c", "Z", 50.0, 1),
    ]
    .into_iter()
    .collect();

    let engine = PlanningEngine::new(&config(&[], 600.0, 2)).unwrap();
    let report = engine.plan(pool);

    assert_eq!(report.plan.len(), 3);
    assert_eq!(report.plan.total_duration_seconds(), 300.0);
    let shortfall = report.status.shortfall().expect("shortfall reported");
    assert_eq!(shortfall.missing_seconds(), 300.0);
    assert_eq!(shortfall.target_duration_seconds, 600.0);
}

#[test]
fn test_malformed_records_do_not_abort_ingest() {
    let mut aggregator = CandidateAggregator::new();
    let stats = aggregator.ingest(vec![
        clip("", "X", 10.0, 1),
        clip("neg", "X", -5.0, 1),
        clip("good", "X", 10.0, 1),
    ]);

    assert_eq!(stats.dropped(), 2);
    let (pool, totals) = aggregator.finish();
    assert_eq!(pool.len(), 1);
    assert_eq!(totals.dropped(), 2);
}

#[test]
fn test_invalid_config_fails_before_planning() {
    assert!(PlanningEngine::new(&config(&[], 600.0, 0)).is_err());
    assert!(PlanningEngine::new(&config(&[], -1.0, 3)).is_err());
}
