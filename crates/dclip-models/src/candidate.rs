//! Clip candidate models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier of a clip. Identity for deduplication.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ClipId(pub String);

impl ClipId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClipId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClipId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity of the channel or account that owns a clip.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct PublisherId(pub String);

impl PublisherId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PublisherId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PublisherId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A short video segment discovered by a source adapter.
///
/// Fields are private: once a candidate is built it is only read, filtered,
/// reordered or collected. The `with_*` methods are for construction.
/// Missing fields deserialize to empty defaults so that structurally broken
/// records reach the aggregator and get counted instead of failing a whole
/// source response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipCandidate {
    #[serde(default)]
    id: ClipId,

    /// Page URL of the clip
    #[serde(default)]
    source_url: String,

    /// Thumbnail or preview locator
    #[serde(default)]
    preview_url: String,

    #[serde(default)]
    title: String,

    /// Display name of the publisher
    #[serde(default)]
    publisher_name: String,

    #[serde(default)]
    publisher_id: PublisherId,

    /// View count (or equivalent) at query time
    #[serde(default)]
    popularity: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,

    /// Short language/region code, e.g. "fr"
    #[serde(default)]
    locale: String,

    /// Duration reported by the source. Never estimated.
    #[serde(default)]
    duration_seconds: f64,
}

impl ClipCandidate {
    /// Create a candidate with its identity, owner and duration.
    pub fn new(
        id: impl Into<ClipId>,
        publisher_id: impl Into<PublisherId>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source_url: String::new(),
            preview_url: String::new(),
            title: String::new(),
            publisher_name: String::new(),
            publisher_id: publisher_id.into(),
            popularity: 0,
            created_at: None,
            locale: String::new(),
            duration_seconds,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_publisher_name(mut self, name: impl Into<String>) -> Self {
        self.publisher_name = name.into();
        self
    }

    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_urls(mut self, source_url: impl Into<String>, preview_url: impl Into<String>) -> Self {
        self.source_url = source_url.into();
        self.preview_url = preview_url.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn id(&self) -> &ClipId {
        &self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn publisher_name(&self) -> &str {
        &self.publisher_name
    }

    pub fn publisher_id(&self) -> &PublisherId {
        &self.publisher_id
    }

    pub fn popularity(&self) -> u64 {
        self.popularity
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Title for display, falling back to a placeholder for untitled clips.
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            "Untitled clip"
        } else {
            title
        }
    }

    /// Publisher name for display, falling back to the publisher id.
    pub fn display_publisher(&self) -> &str {
        let name = self.publisher_name.trim();
        if name.is_empty() {
            self.publisher_id.as_str()
        } else {
            name
        }
    }
}
