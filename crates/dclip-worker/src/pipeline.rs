//! The daily run: gather, plan, hand off.
//!
//! Stages:
//! 1. Query every source for every query (concurrent, joined before ingest)
//! 2. Ingest batches in submission order into one aggregator
//! 3. Plan (filter, order, commit) and apply the shortfall policy
//! 4. Write the plan, render manifest and publish metadata
//! 5. Optionally concatenate with ffmpeg
//! 6. Record run metrics, then write the metrics snapshot and run report

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use dclip_planner::{
    metrics as planner_metrics, CandidateAggregator, CommitStatus, CompilationPlan, FilterStats,
    IngestStats, PlanningEngine,
};
use dclip_sources::{gather, CandidateSource, SourceFailure};

use crate::config::{ShortfallPolicy, WorkerConfig};
use crate::error::{WorkerError, WorkerResult};
use crate::ffmpeg::ConcatCommand;
use crate::logging::RunLogger;
use crate::metadata::PublishMetadata;
use crate::metrics;
use crate::render;

pub const PLAN_FILE: &str = "compilation_plan.json";
pub const METADATA_FILE: &str = "video_metadata.json";
pub const REPORT_FILE: &str = "run_report.json";
pub const METRICS_FILE: &str = "metrics.prom";
pub const COMPILED_FILE: &str = "compiled_video.mp4";

/// Files a run left in the work directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunArtifacts {
    pub plan: PathBuf,
    pub metadata: PathBuf,
    pub concat_list: PathBuf,
    pub captions: PathBuf,
    pub downloads: PathBuf,
    pub report: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiled: Option<PathBuf>,
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub queries: usize,
    pub source_failures: Vec<SourceFailure>,
    pub ingest: IngestStats,
    pub pool_size: usize,
    pub filter: FilterStats,
    pub status: CommitStatus,
    pub committed: usize,
    pub total_duration_seconds: f64,
    pub artifacts: RunArtifacts,
}

/// Read a plan hand-off file and check its offsets.
pub async fn load_plan(path: &Path) -> WorkerResult<CompilationPlan> {
    let raw = tokio::fs::read(path).await?;
    let plan: CompilationPlan = serde_json::from_slice(&raw)?;
    plan.verify_offsets()?;
    Ok(plan)
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> WorkerResult<()> {
    tokio::fs::write(path, serde_json::to_vec_pretty(value)?).await?;
    Ok(())
}

/// One configured daily run.
pub struct DailyRun {
    config: WorkerConfig,
    engine: PlanningEngine,
    sources: Vec<Arc<dyn CandidateSource>>,
    metrics: Option<PrometheusHandle>,
}

impl DailyRun {
    /// Validate the configuration and build the configured sources.
    pub fn new(config: WorkerConfig) -> WorkerResult<Self> {
        config.check()?;
        let sources = config.build_sources()?;
        Self::with_sources(config, sources)
    }

    /// Use explicit sources instead of the configured ones.
    pub fn with_sources(
        config: WorkerConfig,
        sources: Vec<Arc<dyn CandidateSource>>,
    ) -> WorkerResult<Self> {
        let engine = PlanningEngine::new(&config.planner)?;
        if sources.is_empty() {
            return Err(WorkerError::config("no candidate sources"));
        }
        Ok(Self {
            config,
            engine,
            sources,
            metrics: None,
        })
    }

    /// Render metrics into the work directory at the end of each run,
    /// failed runs included.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Execute one run for the window ending at `now`.
    pub async fn run(&self, now: DateTime<Utc>) -> WorkerResult<RunReport> {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let logger = RunLogger::new(&run_id, "run");
        logger.log_start(&format!("daily compilation for {}", now.date_naive()));

        let result = self
            .execute(&run_id, now, &logger)
            .instrument(logger.create_span())
            .await;

        let status = match &result {
            Ok(report) => report.status.as_str(),
            Err(_) => "failed",
        };
        metrics::record_run(status, started.elapsed());

        let result = match result {
            Ok(mut report) => self.finish_report(&mut report).await.map(|()| report),
            Err(e) => {
                if let Err(snapshot_err) = self.write_metrics().await {
                    logger.log_warning(&format!("metrics snapshot not written: {}", snapshot_err));
                }
                Err(e)
            }
        };

        match &result {
            Ok(report) => logger.log_completion(&format!(
                "{} clip(s), {:.1}s, status {}",
                report.committed, report.total_duration_seconds, status
            )),
            Err(e) => logger.log_error(&e.to_string()),
        }
        result
    }

    /// Snapshot metrics (after the run counters are in) and write the report.
    async fn finish_report(&self, report: &mut RunReport) -> WorkerResult<()> {
        report.artifacts.metrics = self.write_metrics().await?;
        write_json(&report.artifacts.report, &*report).await
    }

    async fn write_metrics(&self) -> WorkerResult<Option<PathBuf>> {
        let Some(handle) = &self.metrics else {
            return Ok(None);
        };
        let path = self.config.output.work_dir.join(METRICS_FILE);
        metrics::write_snapshot(handle, &path).await?;
        Ok(Some(path))
    }

    async fn execute(
        &self,
        run_id: &str,
        now: DateTime<Utc>,
        logger: &RunLogger,
    ) -> WorkerResult<RunReport> {
        let work_dir = self.config.output.work_dir.clone();
        tokio::fs::create_dir_all(&work_dir).await?;

        // Gather
        let gather_log = logger.stage("gather");
        let queries = self.config.build_queries(now);
        gather_log.log_start(&format!(
            "{} quer(ies) across {} source(s)",
            queries.len(),
            self.sources.len()
        ));
        let outcome = gather(&self.sources, &queries, self.config.sources.concurrency).await;
        metrics::record_gather(queries.len() * self.sources.len(), outcome.failures.len());
        for failure in &outcome.failures {
            gather_log.log_warning(&format!(
                "{} failed for {}: {}",
                failure.source, failure.query, failure.error
            ));
        }
        let source_failures = outcome.failures.clone();

        // Ingest; every batch is in before the pool is taken
        let mut aggregator = CandidateAggregator::new();
        for batch in outcome.batches {
            aggregator.ingest(batch.candidates);
        }
        let (pool, ingest) = aggregator.finish();
        planner_metrics::record_ingest(&ingest);
        gather_log.log_completion(&format!(
            "{} received, {} unique, {} replaced, {} dropped",
            ingest.received,
            pool.len(),
            ingest.replaced,
            ingest.dropped()
        ));

        // Plan
        let plan_log = logger.stage("plan");
        let planned = self.engine.plan(pool);
        if let Some(shortfall) = planned.status.shortfall() {
            if self.config.shortfall_policy == ShortfallPolicy::Abort {
                return Err(WorkerError::ShortfallRejected {
                    missing_seconds: shortfall.missing_seconds(),
                    missing_count: shortfall.missing_count(),
                });
            }
            plan_log.log_warning(&format!(
                "publishing partial plan, {:.1}s short",
                shortfall.missing_seconds()
            ));
        }

        let plan_path = work_dir.join(PLAN_FILE);
        write_json(&plan_path, &planned.plan).await?;

        // Render manifest and publish metadata
        let render_log = logger.stage("render");
        let manifest =
            render::write_manifest(&planned.plan, &work_dir, &self.config.output.clips_dir())
                .await?;

        let metadata = PublishMetadata::build(&planned.plan, &self.config.publish, now.date_naive());
        let metadata_path = work_dir.join(METADATA_FILE);
        write_json(&metadata_path, &metadata).await?;
        render_log.log_progress(&format!("metadata written: {}", metadata.title));

        let compiled = if self.config.output.run_ffmpeg && !planned.plan.is_empty() {
            let output = work_dir.join(COMPILED_FILE);
            ConcatCommand::new(&manifest.concat_list, &output)
                .run(Duration::from_secs(self.config.output.ffmpeg_timeout_secs))
                .await?;
            Some(output)
        } else {
            None
        };

        let report = RunReport {
            run_id: run_id.to_string(),
            started_at: now,
            queries: queries.len(),
            source_failures,
            ingest,
            pool_size: planned.pool_size,
            filter: planned.filter,
            status: planned.status,
            committed: planned.plan.len(),
            total_duration_seconds: planned.plan.total_duration_seconds(),
            artifacts: RunArtifacts {
                plan: plan_path,
                metadata: metadata_path,
                concat_list: manifest.concat_list,
                captions: manifest.captions,
                downloads: manifest.downloads,
                report: work_dir.join(REPORT_FILE),
                metrics: None,
                compiled,
            },
        };
        Ok(report)
    }
}
