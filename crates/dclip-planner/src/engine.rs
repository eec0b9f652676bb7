//! Planning engine facade.
//!
//! Wires the filter, sequencer and committer for one configuration:
//!
//! 1. Filter the pool (per-candidate quality checks)
//! 2. Order the survivors (priority list, then popularity)
//! 3. Commit the shortest satisfying prefix, computing offsets inline

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::CandidatePool;
use crate::committer::{CommitStatus, PlaylistCommitter};
use crate::config::PlannerConfig;
use crate::error::PlannerResult;
use crate::filter::{FilterStats, QualityFilter};
use crate::metrics;
use crate::plan::CompilationPlan;
use crate::sequencer::PrioritySequencer;

/// Everything the engine produced for one pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub plan: CompilationPlan,
    pub status: CommitStatus,
    /// Candidates in the pool before filtering
    pub pool_size: usize,
    pub filter: FilterStats,
}

/// Configured, validated engine. Construction is the only fallible step.
#[derive(Debug, Clone)]
pub struct PlanningEngine {
    filter: QualityFilter,
    sequencer: PrioritySequencer,
    committer: PlaylistCommitter,
}

impl PlanningEngine {
    /// Validate `config` and build the engine.
    pub fn new(config: &PlannerConfig) -> PlannerResult<Self> {
        config.check()?;

        let filter = QualityFilter::new(&config.accepted_locales, &config.title_blacklist)?;
        let sequencer = PrioritySequencer::new(config.priority_publishers.iter().cloned());
        let committer = PlaylistCommitter::new(config.min_duration_seconds, config.min_count);

        Ok(Self {
            filter,
            sequencer,
            committer,
        })
    }

    pub fn filter(&self) -> &QualityFilter {
        &self.filter
    }

    pub fn sequencer(&self) -> &PrioritySequencer {
        &self.sequencer
    }

    pub fn committer(&self) -> &PlaylistCommitter {
        &self.committer
    }

    /// Filter, order and commit a pool.
    pub fn plan(&self, mut pool: CandidatePool) -> PlanReport {
        let pool_size = pool.len();

        let filter = self.filter.apply(&mut pool);
        metrics::record_filter(&filter);
        info!(
            pool_size,
            accepted = filter.accepted,
            rejected = filter.rejected(),
            "Filtered candidate pool"
        );

        let ordered = self.sequencer.order(&pool);
        let outcome = self.committer.commit(ordered);
        metrics::record_commit(&outcome);

        match &outcome.status {
            CommitStatus::Satisfied => info!(
                entries = outcome.plan.len(),
                total_duration_secs = outcome.plan.total_duration_seconds(),
                "Committed compilation plan"
            ),
            CommitStatus::Shortfall(shortfall) => warn!(
                entries = outcome.plan.len(),
                total_duration_secs = shortfall.actual_duration_seconds,
                target_duration_secs = shortfall.target_duration_seconds,
                missing_secs = shortfall.missing_seconds(),
                missing_count = shortfall.missing_count(),
                "Candidates exhausted before thresholds were met"
            ),
            CommitStatus::NothingToPublish => warn!("No candidates left after filtering"),
        }

        PlanReport {
            plan: outcome.plan,
            status: outcome.status,
            pool_size,
            filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dclip_models::ClipCandidate;

    fn config() -> PlannerConfig {
        PlannerConfig {
            accepted_locales: vec!["fr".into()],
            priority_publishers: vec!["X".into()],
            title_blacklist: vec!["^test".into()],
            min_duration_seconds: 60.0,
            min_count: 2,
        }
    }

    #[test]
    fn test_new_rejects_bad_pattern() {
        let cfg = PlannerConfig {
            title_blacklist: vec!["[".into()],
            ..config()
        };
        assert!(PlanningEngine::new(&cfg).unwrap_err().is_config_error());
    }

    #[test]
    fn test_new_rejects_zero_min_count() {
        let cfg = PlannerConfig {
            min_count: 0,
            ..config()
        };
        assert!(PlanningEngine::new(&cfg).is_err());
    }

    #[test]
    fn test_plan_filters_orders_and_commits() {
        let engine = PlanningEngine::new(&config()).unwrap();
        let pool: CandidatePool = vec![
            ClipCandidate::new("a", "Y", 40.0).with_locale("fr").with_popularity(900),
            ClipCandidate::new("b", "X", 30.0).with_locale("fr").with_popularity(10),
            ClipCandidate::new("c", "X", 30.0).with_locale("de").with_popularity(50),
            ClipCandidate::new("d", "X", 30.0)
                .with_locale("fr")
                .with_title("test clip")
                .with_popularity(70),
        ]
        .into_iter()
        .collect();

        let report = engine.plan(pool);

        assert_eq!(report.pool_size, 4);
        assert_eq!(report.filter.accepted, 2);
        assert_eq!(report.status, CommitStatus::Satisfied);
        let ids: Vec<_> = report
            .plan
            .entries()
            .iter()
            .map(|e| e.candidate().id().as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(report.plan.offsets(), vec![0.0, 30.0]);
    }

    #[test]
    fn test_plan_empty_pool() {
        let engine = PlanningEngine::new(&config()).unwrap();
        let report = engine.plan(CandidatePool::default());
        assert!(report.plan.is_empty());
        assert_eq!(report.status, CommitStatus::NothingToPublish);
    }
}
