//! Run-level metrics and the Prometheus recorder.
//!
//! Planner counters live in `dclip_planner::metrics`; this module adds the
//! run-scoped ones and renders everything to a file at the end of the run.

use std::path::Path;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::error::{WorkerError, WorkerResult};

/// Metric names as constants for consistency.
pub mod names {
    pub const RUNS_TOTAL: &str = "dclip_runs_total";
    pub const RUN_DURATION_SECONDS: &str = "dclip_run_duration_seconds";
    pub const SOURCE_QUERIES_TOTAL: &str = "dclip_source_queries_total";
    pub const SOURCE_FAILURES_TOTAL: &str = "dclip_source_failures_total";
}

/// Install the global Prometheus recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> WorkerResult<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| WorkerError::config(format!("Failed to install Prometheus recorder: {}", e)))
}

pub fn record_gather(queries: usize, failures: usize) {
    counter!(names::SOURCE_QUERIES_TOTAL).increment(queries as u64);
    counter!(names::SOURCE_FAILURES_TOTAL).increment(failures as u64);
}

pub fn record_run(status: &str, elapsed: Duration) {
    counter!(names::RUNS_TOTAL, "status" => status.to_string()).increment(1);
    histogram!(names::RUN_DURATION_SECONDS).record(elapsed.as_secs_f64());
}

/// Write the Prometheus text exposition to `path`.
pub async fn write_snapshot(handle: &PrometheusHandle, path: &Path) -> WorkerResult<()> {
    tokio::fs::write(path, handle.render()).await?;
    Ok(())
}
