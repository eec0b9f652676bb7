//! Clip catalog adapters.
//!
//! Every adapter implements [`CandidateSource`]: one query in, a list of
//! normalized [`ClipCandidate`](dclip_models::ClipCandidate)s out. The
//! [`gather`] helper fans queries out concurrently and hands results back in
//! query order once all of them have finished.

pub mod error;
pub mod gather;
pub mod helix;
pub mod json_file;
pub mod record;
pub mod traits;

pub use error::{SourceError, SourceResult};
pub use gather::{gather, GatherOutcome, QueryBatch, SourceFailure};
pub use helix::{HelixClipSource, HelixConfig};
pub use json_file::JsonFileSource;
pub use record::HelixClip;
pub use traits::CandidateSource;
