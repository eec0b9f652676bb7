//! Planner metrics.
//!
//! Emitted through the `metrics` facade; without an installed recorder these
//! calls are no-ops.

use metrics::{counter, gauge};

use crate::aggregator::IngestStats;
use crate::committer::CommitOutcome;
use crate::filter::FilterStats;

/// Metric names as constants for consistency.
pub mod names {
    pub const CANDIDATES_RECEIVED_TOTAL: &str = "dclip_candidates_received_total";
    pub const CANDIDATES_REPLACED_TOTAL: &str = "dclip_candidates_replaced_total";
    pub const CANDIDATES_DROPPED_TOTAL: &str = "dclip_candidates_dropped_total";
    pub const CANDIDATES_REJECTED_TOTAL: &str = "dclip_candidates_rejected_total";
    pub const POOL_SIZE: &str = "dclip_pool_size";
    pub const PLAN_ENTRIES: &str = "dclip_plan_entries";
    pub const PLAN_DURATION_SECONDS: &str = "dclip_plan_duration_seconds";
    pub const PLAN_SHORTFALL_SECONDS: &str = "dclip_plan_shortfall_seconds";
}

/// Record aggregation counters.
pub fn record_ingest(stats: &IngestStats) {
    counter!(names::CANDIDATES_RECEIVED_TOTAL).increment(stats.received as u64);
    counter!(names::CANDIDATES_REPLACED_TOTAL).increment(stats.replaced as u64);
    counter!(names::CANDIDATES_DROPPED_TOTAL, "reason" => "missing_id")
        .increment(stats.dropped_missing_id as u64);
    counter!(names::CANDIDATES_DROPPED_TOTAL, "reason" => "invalid_duration")
        .increment(stats.dropped_invalid_duration as u64);
}

/// Record filter rejections and the surviving pool size.
pub fn record_filter(stats: &FilterStats) {
    counter!(names::CANDIDATES_REJECTED_TOTAL, "reason" => "non_positive_duration")
        .increment(stats.non_positive_duration as u64);
    counter!(names::CANDIDATES_REJECTED_TOTAL, "reason" => "locale_not_accepted")
        .increment(stats.locale_not_accepted as u64);
    counter!(names::CANDIDATES_REJECTED_TOTAL, "reason" => "blacklisted_title")
        .increment(stats.blacklisted_title as u64);
    gauge!(names::POOL_SIZE).set(stats.accepted as f64);
}

/// Record the committed plan.
pub fn record_commit(outcome: &CommitOutcome) {
    gauge!(names::PLAN_ENTRIES).set(outcome.plan.len() as f64);
    gauge!(names::PLAN_DURATION_SECONDS).set(outcome.plan.total_duration_seconds());
    let missing = outcome
        .status
        .shortfall()
        .map(|s| s.missing_seconds())
        .unwrap_or(0.0);
    gauge!(names::PLAN_SHORTFALL_SECONDS).set(missing);
}
