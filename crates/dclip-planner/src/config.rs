//! Planner configuration.
//!
//! Read once at run start. [`PlannerConfig::check`] runs before any source is
//! queried; a config that fails it never reaches the engine.

use serde::{Deserialize, Serialize};
use validator::Validate;

use dclip_models::PublisherId;

use crate::error::{PlannerError, PlannerResult};

/// Selection policy for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PlannerConfig {
    /// Locale codes a clip must carry to be accepted (case-insensitive).
    #[validate(length(min = 1, message = "at least one accepted locale is required"))]
    #[serde(default = "default_accepted_locales")]
    pub accepted_locales: Vec<String>,

    /// Publishers favored over raw popularity, highest priority first.
    #[serde(default)]
    pub priority_publishers: Vec<PublisherId>,

    /// Regex patterns; a clip whose title matches any of them is rejected.
    /// Matching is case-insensitive.
    #[serde(default)]
    pub title_blacklist: Vec<String>,

    /// Minimum total duration of the compilation, in seconds.
    #[validate(range(min = 0.0, message = "min_duration_seconds cannot be negative"))]
    #[serde(default = "default_min_duration_seconds")]
    pub min_duration_seconds: f64,

    /// Minimum number of clips in the compilation.
    #[validate(range(min = 1, message = "min_count must be at least 1"))]
    #[serde(default = "default_min_count")]
    pub min_count: usize,
}

fn default_accepted_locales() -> Vec<String> {
    vec!["fr".to_string()]
}

fn default_min_duration_seconds() -> f64 {
    600.0
}

fn default_min_count() -> usize {
    5
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            accepted_locales: default_accepted_locales(),
            priority_publishers: Vec::new(),
            title_blacklist: Vec::new(),
            min_duration_seconds: default_min_duration_seconds(),
            min_count: default_min_count(),
        }
    }
}

impl PlannerConfig {
    /// Validate the configuration.
    ///
    /// Pattern compilation is checked when the quality filter is built.
    pub fn check(&self) -> PlannerResult<()> {
        self.validate()?;

        if !self.min_duration_seconds.is_finite() {
            return Err(PlannerError::invalid_config(
                "min_duration_seconds must be a finite number",
            ));
        }

        if self.accepted_locales.iter().any(|l| l.trim().is_empty()) {
            return Err(PlannerError::invalid_config(
                "accepted_locales cannot contain empty entries",
            ));
        }

        if self.priority_publishers.iter().any(|p| p.as_str().trim().is_empty()) {
            return Err(PlannerError::invalid_config(
                "priority_publishers cannot contain empty entries",
            ));
        }

        Ok(())
    }
}
