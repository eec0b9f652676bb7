//! The adapter seam.

use async_trait::async_trait;

use dclip_models::{ClipCandidate, SourceQuery};

use crate::error::SourceResult;

/// A catalog that can answer a single topic or publisher query.
///
/// Implementations return candidates in whatever order the catalog uses;
/// deduplication and validation happen downstream.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short label used in logs and failure reports.
    fn name(&self) -> &str;

    async fn fetch(&self, query: &SourceQuery) -> SourceResult<Vec<ClipCandidate>>;
}
