//! Helix clips catalog client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use dclip_models::{ClipCandidate, SourceFilter, SourceQuery};

use crate::error::{SourceError, SourceResult};
use crate::record::HelixPage;
use crate::traits::CandidateSource;

/// Largest `first` value the catalog accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for the Helix client.
#[derive(Debug, Clone)]
pub struct HelixConfig {
    /// API root, e.g. `https://api.twitch.tv/helix`
    pub base_url: String,
    pub client_id: String,
    /// App access token; acquisition happens outside this crate
    pub bearer_token: String,
    /// Clips requested per page (`first`)
    pub page_size: u32,
    /// Pages followed per query through `pagination.cursor`
    pub max_pages: u32,
    pub timeout: Duration,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitch.tv/helix".to_string(),
            client_id: String::new(),
            bearer_token: String::new(),
            page_size: 100,
            max_pages: 5,
            timeout: Duration::from_secs(30),
        }
    }
}

impl HelixConfig {
    fn check(&self) -> SourceResult<Url> {
        if self.client_id.trim().is_empty() {
            return Err(SourceError::invalid_config("helix client id is empty"));
        }
        if self.bearer_token.trim().is_empty() {
            return Err(SourceError::invalid_config("helix bearer token is empty"));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SourceError::invalid_config(format!(
                "helix page size must be within 1..={}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.max_pages == 0 {
            return Err(SourceError::invalid_config("helix max pages must be at least 1"));
        }

        let base = self.base_url.trim_end_matches('/');
        Url::parse(&format!("{}/clips", base)).map_err(|e| {
            SourceError::invalid_config(format!("invalid helix base url '{}': {}", self.base_url, e))
        })
    }
}

/// Catalog adapter for `GET {base}/clips`.
pub struct HelixClipSource {
    http: Client,
    config: HelixConfig,
    clips_url: Url,
}

impl HelixClipSource {
    pub fn new(config: HelixConfig) -> SourceResult<Self> {
        let clips_url = config.check()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SourceError::Network)?;

        Ok(Self {
            http,
            config,
            clips_url,
        })
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    fn query_params(query: &SourceQuery, first: u32, after: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (
                "started_at",
                query
                    .window
                    .started_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "ended_at",
                query.window.ended_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("first", first.to_string()),
        ];
        match &query.filter {
            SourceFilter::Topic(id) => params.push(("game_id", id.clone())),
            SourceFilter::Publisher(id) => params.push(("broadcaster_id", id.as_str().to_string())),
        }
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }
        params
    }

    async fn fetch_page(&self, params: &[(&'static str, String)]) -> SourceResult<HelixPage> {
        let response = self
            .http
            .get(self.clips_url.clone())
            .header("Client-ID", self.config.client_id.as_str())
            .bearer_auth(&self.config.bearer_token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::ServiceUnavailable(format!(
                "helix returned {}",
                status
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::RequestFailed(format!(
                "helix returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CandidateSource for HelixClipSource {
    fn name(&self) -> &str {
        "helix"
    }

    async fn fetch(&self, query: &SourceQuery) -> SourceResult<Vec<ClipCandidate>> {
        let mut candidates = Vec::new();
        let mut cursor: Option<String> = None;

        for page_index in 0..self.config.max_pages {
            let params = Self::query_params(query, self.config.page_size, cursor.as_deref());
            let page = self.fetch_page(&params).await?;

            debug!(
                query = %query,
                page = page_index + 1,
                clips = page.data.len(),
                "Fetched helix page"
            );

            let exhausted = page.data.is_empty();
            candidates.extend(page.data.into_iter().map(|clip| clip.into_candidate()));

            cursor = page.pagination.cursor.filter(|c| !c.is_empty());
            if exhausted || cursor.is_none() {
                break;
            }
        }

        Ok(candidates)
    }
}
