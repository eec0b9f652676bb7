//! Daily compilation worker binary.

use anyhow::Context;
use chrono::Utc;
use tracing::{error, info};

use dclip_worker::logging::init_tracing;
use dclip_worker::metrics::init_metrics;
use dclip_worker::{DailyRun, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();
    info!("Starting dclip-worker");

    let config = WorkerConfig::load().context("loading configuration")?;
    info!(
        work_dir = %config.output.work_dir.display(),
        min_duration_secs = config.planner.min_duration_seconds,
        min_count = config.planner.min_count,
        shortfall_policy = ?config.shortfall_policy,
        "Worker config loaded"
    );

    let metrics_handle = init_metrics().context("installing metrics recorder")?;
    let run = DailyRun::new(config)
        .context("preparing daily run")?
        .with_metrics(metrics_handle);

    match run.run(Utc::now()).await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                status = report.status.as_str(),
                report = %report.artifacts.report.display(),
                "Run finished"
            );
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
