//! Greedy playlist commitment.

use serde::Serialize;

use dclip_models::ClipCandidate;

use crate::offsets::OffsetAccumulator;
use crate::plan::{CompilationPlan, PlanEntry};

/// How far a partial plan fell short of its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shortfall {
    pub target_duration_seconds: f64,
    pub actual_duration_seconds: f64,
    pub target_count: usize,
    pub actual_count: usize,
}

impl Shortfall {
    /// Seconds missing from the duration target (zero if it was met).
    pub fn missing_seconds(&self) -> f64 {
        (self.target_duration_seconds - self.actual_duration_seconds).max(0.0)
    }

    /// Clips missing from the count target (zero if it was met).
    pub fn missing_count(&self) -> usize {
        self.target_count.saturating_sub(self.actual_count)
    }
}

/// Result classification of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitStatus {
    /// Both thresholds met
    Satisfied,
    /// Input ran out first; the plan holds everything that was offered
    Shortfall(Shortfall),
    /// No candidates to commit
    NothingToPublish,
}

impl CommitStatus {
    pub fn shortfall(&self) -> Option<&Shortfall> {
        match self {
            CommitStatus::Shortfall(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStatus::Satisfied => "satisfied",
            CommitStatus::Shortfall(_) => "shortfall",
            CommitStatus::NothingToPublish => "nothing_to_publish",
        }
    }
}

/// A committed plan and how it relates to the thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub plan: CompilationPlan,
    pub status: CommitStatus,
}

/// Walks an ordered sequence and freezes the shortest prefix that meets
/// both thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaylistCommitter {
    min_duration_seconds: f64,
    min_count: usize,
}

impl PlaylistCommitter {
    /// Thresholds are expected to come from a checked
    /// [`PlannerConfig`](crate::PlannerConfig).
    pub fn new(min_duration_seconds: f64, min_count: usize) -> Self {
        Self {
            min_duration_seconds,
            min_count,
        }
    }

    pub fn min_duration_seconds(&self) -> f64 {
        self.min_duration_seconds
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    /// Commit a prefix of `ordered`.
    ///
    /// Each candidate is appended with the running total as its offset. The
    /// walk stops right after the append that makes both the duration and
    /// the count threshold hold, so a single long clip cannot end the plan
    /// while the count is still short.
    pub fn commit<I>(&self, ordered: I) -> CommitOutcome
    where
        I: IntoIterator<Item = ClipCandidate>,
    {
        let mut acc = OffsetAccumulator::new();
        let mut entries = Vec::new();
        let mut satisfied = false;

        for candidate in ordered {
            let start = acc.place(candidate.duration_seconds());
            entries.push(PlanEntry::new(candidate, start));

            if acc.total() >= self.min_duration_seconds && entries.len() >= self.min_count {
                satisfied = true;
                break;
            }
        }

        let status = if entries.is_empty() {
            CommitStatus::NothingToPublish
        } else if satisfied {
            CommitStatus::Satisfied
        } else {
            CommitStatus::Shortfall(Shortfall {
                target_duration_seconds: self.min_duration_seconds,
                actual_duration_seconds: acc.total(),
                target_count: self.min_count,
                actual_count: entries.len(),
            })
        };

        CommitOutcome {
            plan: CompilationPlan::new(entries, acc.total()),
            status,
        }
    }
}
