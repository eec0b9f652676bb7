//! Clip selection and compilation planning engine.
//!
//! This crate provides:
//! - Candidate aggregation with id-based deduplication
//! - Per-candidate quality filtering
//! - Two-tier priority sequencing (publisher list, then popularity)
//! - Greedy playlist commitment against duration and count thresholds
//! - The canonical offset table every downstream stage reads
//!
//! The engine is synchronous and performs no I/O.

pub mod aggregator;
pub mod committer;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod offsets;
pub mod plan;
pub mod sequencer;

pub use aggregator::{CandidateAggregator, CandidatePool, DropReason, IngestStats};
pub use committer::{CommitOutcome, CommitStatus, PlaylistCommitter, Shortfall};
pub use config::PlannerConfig;
pub use engine::{PlanReport, PlanningEngine};
pub use error::{PlannerError, PlannerResult};
pub use filter::{FilterStats, QualityFilter, RejectReason};
pub use offsets::prefix_offsets;
pub use plan::{CompilationPlan, PlanEntry};
pub use sequencer::PrioritySequencer;
