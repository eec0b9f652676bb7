//! Shared data models for the DailyClip pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Clip candidates discovered by source adapters
//! - Source queries (topic or publisher filter over a time window)
//! - Timestamp formatting for chapter markers and caption cues

pub mod candidate;
pub mod source;
pub mod timestamp;

// Re-export common types
pub use candidate::{ClipCandidate, ClipId, PublisherId};
pub use source::{SourceFilter, SourceQuery, TimeWindow};
pub use timestamp::{chapter_marker, format_caption_timestamp};
