//! Raw clip records as the Helix catalog (and replay files) carry them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dclip_models::ClipCandidate;

/// One clip object from `GET /clips`.
///
/// Every field defaults so that a record with missing fields still becomes a
/// candidate and is dropped (and counted) by the aggregator rather than
/// failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelixClip {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub broadcaster_id: String,
    #[serde(default)]
    pub broadcaster_name: String,
    #[serde(default)]
    pub game_id: String,
    /// Older replay files call this `viewer_count`
    #[serde(default, alias = "viewer_count")]
    pub view_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: String,
    /// Seconds, as reported by the catalog
    #[serde(default)]
    pub duration: f64,
}

/// One page of `GET /clips`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelixPage {
    #[serde(default)]
    pub data: Vec<HelixClip>,
    #[serde(default)]
    pub pagination: HelixPagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelixPagination {
    #[serde(default)]
    pub cursor: Option<String>,
}

impl HelixClip {
    /// Publisher identity: the broadcaster id, or the display name when a
    /// replay file did not keep the id.
    pub fn publisher_key(&self) -> &str {
        if self.broadcaster_id.trim().is_empty() {
            &self.broadcaster_name
        } else {
            &self.broadcaster_id
        }
    }

    pub fn into_candidate(self) -> ClipCandidate {
        let publisher = self.publisher_key().to_string();
        let mut candidate = ClipCandidate::new(self.id, publisher, self.duration)
            .with_urls(self.url, self.thumbnail_url)
            .with_title(self.title)
            .with_publisher_name(self.broadcaster_name)
            .with_popularity(self.view_count)
            .with_locale(self.language);
        if let Some(created_at) = self.created_at {
            candidate = candidate.with_created_at(created_at);
        }
        candidate
    }
}

impl From<HelixClip> for ClipCandidate {
    fn from(clip: HelixClip) -> Self {
        clip.into_candidate()
    }
}
