//! Worker configuration.
//!
//! Loaded once per run, with later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. TOML file: `$DCLIP_CONFIG` if set, otherwise an optional `./dclip.toml`
//! 3. `DCLIP__<SECTION>__<KEY>` environment variables
//!    (e.g. `DCLIP__SOURCES__CLIENT_ID`)

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use dclip_models::{PublisherId, SourceQuery, TimeWindow};
use dclip_planner::PlannerConfig;
use dclip_sources::{CandidateSource, HelixClipSource, HelixConfig, JsonFileSource};

use crate::error::{WorkerError, WorkerResult};

/// Longest query window accepted, one year.
pub const MAX_WINDOW_HOURS: u32 = 24 * 366;

/// What to do when the committed plan misses its thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortfallPolicy {
    /// Publish the partial plan
    #[default]
    Proceed,
    /// Fail the run
    Abort,
}

/// Catalog access and query shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub helix_base_url: String,
    /// Helix is queried only when this is set
    pub client_id: String,
    pub bearer_token: String,
    /// Length of the query window ending at run start
    pub window_hours: u32,
    pub page_size: u32,
    pub max_pages: u32,
    pub request_timeout_secs: u64,
    /// Maximum catalog requests in flight
    pub concurrency: usize,
    /// Topic (game/category) ids to query
    pub category_ids: Vec<String>,
    /// Publisher ids to query in addition to the priority publishers
    pub broadcaster_ids: Vec<String>,
    /// Saved clip files served as an extra source
    pub input_files: Vec<PathBuf>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let helix = HelixConfig::default();
        Self {
            helix_base_url: helix.base_url,
            client_id: String::new(),
            bearer_token: String::new(),
            window_hours: 24,
            page_size: helix.page_size,
            max_pages: helix.max_pages,
            request_timeout_secs: helix.timeout.as_secs(),
            concurrency: 4,
            category_ids: Vec::new(),
            broadcaster_ids: Vec::new(),
            input_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the plan, manifests, metadata and metrics
    pub work_dir: PathBuf,
    /// Where downloaded clip files live; defaults to `<work_dir>/clips`
    pub clips_dir: Option<PathBuf>,
    /// Run `ffmpeg` over the concat list at the end of the run
    pub run_ffmpeg: bool,
    pub ffmpeg_timeout_secs: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/dclip"),
            clips_dir: None,
            run_ffmpeg: false,
            ffmpeg_timeout_secs: 1800,
        }
    }
}

impl OutputConfig {
    pub fn clips_dir(&self) -> PathBuf {
        self.clips_dir
            .clone()
            .unwrap_or_else(|| self.work_dir.join("clips"))
    }
}

/// Publishing copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub channel_label: String,
    pub tags: Vec<String>,
    pub category: String,
    /// Closing line of the description, before the hashtags
    pub call_to_action: String,
    /// Description used when there is nothing to publish
    pub empty_description: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            channel_label: "Le Clip Twitch du Jour FR".to_string(),
            tags: [
                "Twitch",
                "Clips",
                "BestOf",
                "Gaming",
                "Highlights",
                "DailyClips",
                "Compilation",
                "FR",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            category: "Gaming".to_string(),
            call_to_action: "Subscribe so you never miss a daily compilation!".to_string(),
            empty_description: "No compilation available today. Come back tomorrow!".to_string(),
        }
    }
}

/// Full configuration of one daily run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub planner: PlannerConfig,
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub publish: PublishConfig,
    pub shortfall_policy: ShortfallPolicy,
}

impl WorkerConfig {
    /// Load from `$DCLIP_CONFIG` (or `./dclip.toml`) and the environment.
    pub fn load() -> WorkerResult<Self> {
        let path = std::env::var("DCLIP_CONFIG").ok().map(PathBuf::from);
        Self::load_from(path.as_deref())
    }

    /// Load with an explicit file. A given path must exist.
    pub fn load_from(path: Option<&Path>) -> WorkerResult<Self> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder().add_source(File::with_name("dclip").required(false)),
        };

        let config: Self = builder
            .add_source(
                Environment::with_prefix("DCLIP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("planner.accepted_locales")
                    .with_list_parse_key("planner.priority_publishers")
                    .with_list_parse_key("planner.title_blacklist")
                    .with_list_parse_key("sources.category_ids")
                    .with_list_parse_key("sources.broadcaster_ids")
                    .with_list_parse_key("sources.input_files")
                    .with_list_parse_key("publish.tags"),
            )
            .build()
            .map_err(|e| WorkerError::config(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| WorkerError::config(format!("Failed to parse configuration: {}", e)))?;

        config.check()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a run.
    pub fn check(&self) -> WorkerResult<()> {
        self.planner.check()?;

        if self.sources.client_id.trim().is_empty() && self.sources.input_files.is_empty() {
            return Err(WorkerError::config(
                "no candidate source configured: set sources.client_id or sources.input_files",
            ));
        }
        if self.sources.category_ids.is_empty()
            && self.sources.broadcaster_ids.is_empty()
            && self.planner.priority_publishers.is_empty()
        {
            return Err(WorkerError::config(
                "no queries configured: set sources.category_ids, sources.broadcaster_ids \
                 or planner.priority_publishers",
            ));
        }
        if self.sources.window_hours == 0 || self.sources.window_hours > MAX_WINDOW_HOURS {
            return Err(WorkerError::config(format!(
                "sources.window_hours must be within 1..={}, got {}",
                MAX_WINDOW_HOURS, self.sources.window_hours
            )));
        }
        Ok(())
    }

    /// Topic queries first, then publisher queries (priority publishers
    /// first, each publisher once).
    pub fn build_queries(&self, now: DateTime<Utc>) -> Vec<SourceQuery> {
        let window = TimeWindow::trailing_hours(now, self.sources.window_hours);

        let mut queries: Vec<SourceQuery> = self
            .sources
            .category_ids
            .iter()
            .map(|id| SourceQuery::topic(id.clone(), window))
            .collect();

        let mut seen: Vec<&PublisherId> = Vec::new();
        let extra: Vec<PublisherId> = self
            .sources
            .broadcaster_ids
            .iter()
            .map(|id| PublisherId::from(id.as_str()))
            .collect();
        for publisher in self.planner.priority_publishers.iter().chain(extra.iter()) {
            if !seen.contains(&publisher) {
                seen.push(publisher);
                queries.push(SourceQuery::publisher(publisher.clone(), window));
            }
        }

        queries
    }

    /// Instantiate the configured catalog adapters.
    pub fn build_sources(&self) -> WorkerResult<Vec<Arc<dyn CandidateSource>>> {
        let mut sources: Vec<Arc<dyn CandidateSource>> = Vec::new();

        if !self.sources.client_id.trim().is_empty() {
            let helix = HelixClipSource::new(HelixConfig {
                base_url: self.sources.helix_base_url.clone(),
                client_id: self.sources.client_id.clone(),
                bearer_token: self.sources.bearer_token.clone(),
                page_size: self.sources.page_size,
                max_pages: self.sources.max_pages,
                timeout: Duration::from_secs(self.sources.request_timeout_secs),
            })?;
            sources.push(Arc::new(helix));
        }

        for path in &self.sources.input_files {
            sources.push(Arc::new(JsonFileSource::new(path.clone())));
        }

        Ok(sources)
    }
}
