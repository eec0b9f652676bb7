//! Compilation plan: the committed, ordered playlist with its offsets.

use serde::{Deserialize, Serialize};

use dclip_models::{chapter_marker, ClipCandidate};

use crate::error::{PlannerError, PlannerResult};
use crate::offsets::OffsetAccumulator;

/// One committed clip and where it starts in the compiled asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    candidate: ClipCandidate,
    start_offset_seconds: f64,
}

impl PlanEntry {
    pub(crate) fn new(candidate: ClipCandidate, start_offset_seconds: f64) -> Self {
        Self {
            candidate,
            start_offset_seconds,
        }
    }

    pub fn candidate(&self) -> &ClipCandidate {
        &self.candidate
    }

    pub fn start_offset_seconds(&self) -> f64 {
        self.start_offset_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.candidate.duration_seconds()
    }

    /// Exclusive end of the clip's window: `[start, end)`.
    pub fn end_offset_seconds(&self) -> f64 {
        self.start_offset_seconds + self.candidate.duration_seconds()
    }

    /// `HH:MM:SS` marker for the entry's start.
    pub fn chapter_marker(&self) -> String {
        chapter_marker(self.start_offset_seconds)
    }
}

/// Ordered clips plus the offset table derived from them.
///
/// Built only by the committer; order and offsets are final. Plans read back
/// from disk should be checked with [`CompilationPlan::verify_offsets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationPlan {
    entries: Vec<PlanEntry>,
    total_duration_seconds: f64,
}

impl CompilationPlan {
    pub(crate) fn new(entries: Vec<PlanEntry>, total_duration_seconds: f64) -> Self {
        Self {
            entries,
            total_duration_seconds,
        }
    }

    /// Plan with no entries ("nothing to publish").
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.total_duration_seconds
    }

    /// Stored start offsets, in playback order.
    pub fn offsets(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.start_offset_seconds).collect()
    }

    /// Entry with the highest popularity, first one on ties.
    pub fn most_popular(&self) -> Option<&PlanEntry> {
        self.entries.iter().reduce(|best, e| {
            if e.candidate.popularity() > best.candidate.popularity() {
                e
            } else {
                best
            }
        })
    }

    /// Check stored offsets and total against the canonical prefix sum.
    ///
    /// Comparison is exact: both sides run the same accumulation in the same
    /// order, so any difference means the plan was altered after commit.
    pub fn verify_offsets(&self) -> PlannerResult<()> {
        let mut acc = OffsetAccumulator::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let expected = acc.place(entry.duration_seconds());
            if entry.start_offset_seconds != expected {
                return Err(PlannerError::InconsistentOffsets {
                    index,
                    stored: entry.start_offset_seconds,
                    expected,
                });
            }
        }
        if self.total_duration_seconds != acc.total() {
            return Err(PlannerError::InconsistentTotal {
                stored: self.total_duration_seconds,
                expected: acc.total(),
            });
        }
        Ok(())
    }
}
