//! Candidate aggregation and deduplication.
//!
//! Identity is the clip id alone. When the same id is ingested more than once
//! the later observation replaces the earlier one (last write wins): later
//! queries carry fresher popularity counts. Numeric fields are never combined
//! across observations, so a clip's duration is counted once no matter how
//! many sources report it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use dclip_models::{ClipCandidate, ClipId};

/// Why a record was dropped at ingest time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Empty or whitespace-only id
    MissingId,
    /// Negative or non-finite duration
    InvalidDuration,
}

impl DropReason {
    /// Structural check applied to every ingested record.
    pub fn check(candidate: &ClipCandidate) -> Option<Self> {
        if candidate.id().is_blank() {
            return Some(DropReason::MissingId);
        }
        let duration = candidate.duration_seconds();
        if !duration.is_finite() || duration < 0.0 {
            return Some(DropReason::InvalidDuration);
        }
        None
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingId => "missing_id",
            DropReason::InvalidDuration => "invalid_duration",
        }
    }
}

/// Counters for one or more ingest calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Records handed to `ingest`
    pub received: usize,
    /// Records whose id was not yet in the pool
    pub inserted: usize,
    /// Records that replaced an earlier observation of the same id
    pub replaced: usize,
    pub dropped_missing_id: usize,
    pub dropped_invalid_duration: usize,
}

impl IngestStats {
    /// Total records dropped as malformed.
    pub fn dropped(&self) -> usize {
        self.dropped_missing_id + self.dropped_invalid_duration
    }

    pub fn merge(&mut self, other: &IngestStats) {
        self.received += other.received;
        self.inserted += other.inserted;
        self.replaced += other.replaced;
        self.dropped_missing_id += other.dropped_missing_id;
        self.dropped_invalid_duration += other.dropped_invalid_duration;
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::MissingId => self.dropped_missing_id += 1,
            DropReason::InvalidDuration => self.dropped_invalid_duration += 1,
        }
    }
}

/// Deduplicated working set of candidates for one run.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    clips: HashMap<ClipId, ClipCandidate>,
}

impl CandidatePool {
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn get(&self, id: &ClipId) -> Option<&ClipCandidate> {
        self.clips.get(id)
    }

    /// Iterate candidates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ClipCandidate> {
        self.clips.values()
    }

    /// Sum of durations across the pool, each clip counted once.
    pub fn total_duration_seconds(&self) -> f64 {
        self.clips.values().map(|c| c.duration_seconds()).sum()
    }

    /// Keep only candidates for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&ClipCandidate) -> bool) {
        self.clips.retain(|_, c| keep(c));
    }

    pub fn into_candidates(self) -> Vec<ClipCandidate> {
        self.clips.into_values().collect()
    }

    /// Insert, replacing any earlier candidate with the same id.
    /// Returns true when an entry was replaced.
    fn upsert(&mut self, candidate: ClipCandidate) -> bool {
        self.clips
            .insert(candidate.id().clone(), candidate)
            .is_some()
    }
}

impl FromIterator<ClipCandidate> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = ClipCandidate>>(iter: I) -> Self {
        let mut aggregator = CandidateAggregator::new();
        aggregator.ingest(iter);
        aggregator.snapshot()
    }
}

/// Builds a [`CandidatePool`] from repeated source results.
///
/// `ingest` takes `&mut self`, so concurrent producers either hand their
/// results to a single owner after a join, or share the aggregator behind a
/// lock. Dedup and drop counting are per-record and hold under any
/// interleaving. `snapshot` borrows immutably and therefore cannot overlap an
/// in-progress ingest.
#[derive(Debug, Default)]
pub struct CandidateAggregator {
    pool: CandidatePool,
    stats: IngestStats,
}

impl CandidateAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of candidates into the pool.
    ///
    /// Malformed records are dropped and counted; the rest of the batch is
    /// still ingested. Returns the counters for this batch only.
    pub fn ingest<I>(&mut self, candidates: I) -> IngestStats
    where
        I: IntoIterator<Item = ClipCandidate>,
    {
        let mut batch = IngestStats::default();

        for candidate in candidates {
            batch.received += 1;

            if let Some(reason) = DropReason::check(&candidate) {
                debug!(
                    clip_id = %candidate.id(),
                    reason = reason.as_str(),
                    "Dropping malformed candidate"
                );
                batch.record_drop(reason);
                continue;
            }

            if self.pool.upsert(candidate) {
                batch.replaced += 1;
            } else {
                batch.inserted += 1;
            }
        }

        self.stats.merge(&batch);
        batch
    }

    /// Cumulative counters across all ingest calls.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Number of distinct candidates ingested so far.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Copy of the pool as it stands.
    pub fn snapshot(&self) -> CandidatePool {
        self.pool.clone()
    }

    /// Finish aggregation, returning the pool and cumulative counters.
    pub fn finish(self) -> (CandidatePool, IngestStats) {
        (self.pool, self.stats)
    }
}
