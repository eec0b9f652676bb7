//! Daily compilation worker.
//!
//! This crate provides:
//! - Run configuration (file + environment)
//! - The daily pipeline: gather, plan, hand off
//! - Render manifests (concat list, captions) and optional ffmpeg concat
//! - Publish metadata with chapter markers
//! - Structured run logging and Prometheus metrics

pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod logging;
pub mod metadata;
pub mod metrics;
pub mod pipeline;
pub mod render;

pub use config::{ShortfallPolicy, WorkerConfig};
pub use error::{WorkerError, WorkerResult};
pub use metadata::{PrivacyStatus, PublishMetadata};
pub use pipeline::{load_plan, DailyRun, RunReport};
