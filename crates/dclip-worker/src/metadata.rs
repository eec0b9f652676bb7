//! Publish metadata for the compiled video.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dclip_planner::CompilationPlan;

use crate::config::PublishConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Public,
    Unlisted,
    Private,
}

/// Title, description and classification handed to the publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub privacy_status: PrivacyStatus,
}

/// One description chapter line per entry, `HH:MM:SS title - publisher`.
///
/// Markers come from the plan's stored offsets, so the first one is
/// always `00:00:00`.
pub fn chapter_lines(plan: &CompilationPlan) -> Vec<String> {
    plan.entries()
        .iter()
        .map(|entry| {
            let candidate = entry.candidate();
            format!(
                "{} {} - {}",
                entry.chapter_marker(),
                candidate.display_title(),
                candidate.display_publisher()
            )
        })
        .collect()
}

fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|tag| !tag.is_empty())
        .map(|tag| format!("#{}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}

impl PublishMetadata {
    /// Build metadata for `plan`, published on `date`.
    pub fn build(plan: &CompilationPlan, publish: &PublishConfig, date: NaiveDate) -> Self {
        let Some(top) = plan.most_popular() else {
            return Self::nothing_to_publish(publish, date);
        };

        let title = format!(
            "\"{}\" | {} - {}",
            top.candidate().display_title(),
            publish.channel_label,
            date.format("%d %B")
        );

        let mut description = format!(
            "The {} most popular clips of {}!\n\nChapters:\n",
            plan.len(),
            date.format("%d %B %Y")
        );
        for line in chapter_lines(plan) {
            description.push_str(&line);
            description.push('\n');
        }

        description.push_str("\nClips:\n");
        for (i, entry) in plan.entries().iter().enumerate() {
            let candidate = entry.candidate();
            description.push_str(&format!(
                "- {}. '{}' by {} (views: {})\n",
                i + 1,
                candidate.display_title(),
                candidate.display_publisher(),
                candidate.popularity()
            ));
        }

        description.push('\n');
        description.push_str(&publish.call_to_action);
        description.push_str("\n\n");
        description.push_str(&hashtags(&publish.tags));

        Self {
            title,
            description,
            tags: publish.tags.clone(),
            category: publish.category.clone(),
            privacy_status: PrivacyStatus::Public,
        }
    }

    /// Placeholder metadata for a day without a compilation.
    pub fn nothing_to_publish(publish: &PublishConfig, date: NaiveDate) -> Self {
        Self {
            title: format!("{} - {}", publish.channel_label, date.format("%d %B")),
            description: publish.empty_description.clone(),
            tags: publish.tags.clone(),
            category: publish.category.clone(),
            privacy_status: PrivacyStatus::Unlisted,
        }
    }
}
