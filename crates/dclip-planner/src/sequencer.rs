//! Priority sequencing.
//!
//! Two tiers. Candidates from listed publishers come first, grouped in list
//! order; everything else follows. Inside each group the order is popularity
//! descending, then id ascending, so the result is total and deterministic.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use dclip_models::{ClipCandidate, PublisherId};

use crate::aggregator::CandidatePool;

/// Orders a pool for the playlist committer.
#[derive(Debug, Clone, Default)]
pub struct PrioritySequencer {
    /// Publisher -> position in the priority list (first occurrence).
    ranks: HashMap<PublisherId, usize>,
}

impl PrioritySequencer {
    pub fn new<I>(priority_list: I) -> Self
    where
        I: IntoIterator<Item = PublisherId>,
    {
        let mut ranks = HashMap::new();
        for (rank, publisher) in priority_list.into_iter().enumerate() {
            // A publisher listed twice keeps its earlier slot
            ranks.entry(publisher).or_insert(rank);
        }
        Self { ranks }
    }

    /// Produce the commit order for a pool.
    pub fn order(&self, pool: &CandidatePool) -> Vec<ClipCandidate> {
        let mut ordered: Vec<ClipCandidate> = pool.iter().cloned().collect();
        ordered.sort_by(|a, b| self.compare(a, b));
        ordered
    }

    fn tier(&self, candidate: &ClipCandidate) -> usize {
        self.ranks
            .get(candidate.publisher_id())
            .copied()
            .unwrap_or(usize::MAX)
    }

    fn compare(&self, a: &ClipCandidate, b: &ClipCandidate) -> Ordering {
        (self.tier(a), Reverse(a.popularity()), a.id())
            .cmp(&(self.tier(b), Reverse(b.popularity()), b.id()))
    }
}
