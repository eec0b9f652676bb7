//! Concurrent fan-out over sources and queries.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use dclip_models::{ClipCandidate, SourceQuery};

use crate::traits::CandidateSource;

/// Candidates one source returned for one query.
#[derive(Debug, Clone)]
pub struct QueryBatch {
    pub source: String,
    pub query: SourceQuery,
    pub candidates: Vec<ClipCandidate>,
}

/// A query that failed. Failures are reported, never fatal to the run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub query: String,
    pub error: String,
}

/// Everything a gather produced, in (source, query) submission order.
#[derive(Debug, Clone, Default)]
pub struct GatherOutcome {
    pub batches: Vec<QueryBatch>,
    pub failures: Vec<SourceFailure>,
}

impl GatherOutcome {
    pub fn candidate_count(&self) -> usize {
        self.batches.iter().map(|b| b.candidates.len()).sum()
    }

    /// Candidates from every successful batch, batches in submission order.
    pub fn into_candidates(self) -> impl Iterator<Item = ClipCandidate> {
        self.batches.into_iter().flat_map(|b| b.candidates)
    }
}

/// Run every query against every source with at most `concurrency` requests
/// in flight.
///
/// Returns only after all requests have finished. Results come back in
/// submission order regardless of completion order, so ingesting them
/// sequentially gives the same pool on every run.
pub async fn gather(
    sources: &[Arc<dyn CandidateSource>],
    queries: &[SourceQuery],
    concurrency: usize,
) -> GatherOutcome {
    let jobs: Vec<(&Arc<dyn CandidateSource>, &SourceQuery)> = sources
        .iter()
        .flat_map(|source| queries.iter().map(move |query| (source, query)))
        .collect();
    let submitted = jobs.len();

    let results: Vec<_> = stream::iter(jobs)
        .map(|(source, query)| async move {
            let result = source.fetch(query).await;
            (source.name().to_string(), query.clone(), result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = GatherOutcome::default();
    for (source, query, result) in results {
        match result {
            Ok(candidates) => outcome.batches.push(QueryBatch {
                source,
                query,
                candidates,
            }),
            Err(e) => {
                warn!(source = %source, query = %query, error = %e, "Source query failed");
                outcome.failures.push(SourceFailure {
                    source,
                    query: query.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        submitted,
        succeeded = outcome.batches.len(),
        failed = outcome.failures.len(),
        candidates = outcome.candidate_count(),
        "Gathered candidates from sources"
    );
    outcome
}
