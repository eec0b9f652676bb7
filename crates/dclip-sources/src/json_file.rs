//! Replay adapter over saved clip files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use dclip_models::{ClipCandidate, SourceFilter, SourceQuery};

use crate::error::SourceResult;
use crate::record::HelixClip;
use crate::traits::CandidateSource;

/// Serves queries from a JSON array of clip records, such as a saved
/// `top_clips.json`, so a run can be replayed without the network.
///
/// Records are matched against the query window by `created_at`, against a
/// topic by `game_id` and against a publisher by broadcaster id or name.
/// A record missing `created_at` or `game_id` is not narrowed by that field:
/// saved files often keep only `game_name`.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn matches(clip: &HelixClip, query: &SourceQuery) -> bool {
        let in_window = clip
            .created_at
            .map_or(true, |at| query.window.contains(at));
        let in_filter = match &query.filter {
            SourceFilter::Topic(id) => clip.game_id.trim().is_empty() || clip.game_id == *id,
            SourceFilter::Publisher(id) => clip.publisher_key() == id.as_str(),
        };
        in_window && in_filter
    }
}

#[async_trait]
impl CandidateSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &SourceQuery) -> SourceResult<Vec<ClipCandidate>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<HelixClip> = serde_json::from_str(&raw)?;
        let total = records.len();

        let candidates: Vec<ClipCandidate> = records
            .into_iter()
            .filter(|clip| Self::matches(clip, query))
            .map(HelixClip::into_candidate)
            .collect();

        debug!(
            path = %self.path.display(),
            query = %query,
            total,
            matched = candidates.len(),
            "Read replay file"
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dclip_models::TimeWindow;
    use std::io::Write;

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2025, 2, 25, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 2, 26, 0, 0, 0).unwrap(),
        )
    }

    fn replay_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const RECORDS: &str = r#"[
        {"id": "a", "broadcaster_id": "1", "broadcaster_name": "Alpha", "game_id": "509658",
         "created_at": "2025-02-25T10:00:00Z", "duration": 30.0, "language": "fr"},
        {"id": "b", "broadcaster_id": "2", "broadcaster_name": "Beta", "game_id": "21779",
         "created_at": "2025-02-25T11:00:00Z", "duration": 20.0, "language": "fr"},
        {"id": "c", "broadcaster_id": "1", "broadcaster_name": "Alpha", "game_id": "509658",
         "created_at": "2025-02-24T11:00:00Z", "duration": 25.0, "language": "fr"},
        {"id": "d", "broadcaster_name": "Gamma", "game_id": "509658", "duration": 12.0}
    ]"#;

    #[tokio::test]
    async fn test_topic_query_respects_window() {
        let file = replay_file(RECORDS);
        let source = JsonFileSource::new(file.path());

        let clips = source
            .fetch(&SourceQuery::topic("509658", window()))
            .await
            .unwrap();
        let ids: Vec<_> = clips.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[tokio::test]
    async fn test_publisher_query_matches_name_fallback() {
        let file = replay_file(RECORDS);
        let source = JsonFileSource::new(file.path());

        let by_id = source
            .fetch(&SourceQuery::publisher("2", window()))
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);

        let by_name = source
            .fetch(&SourceQuery::publisher("Gamma", window()))
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id().as_str(), "d");
    }

    #[tokio::test]
    async fn test_record_without_game_id_matches_any_topic() {
        let file = replay_file(
            r#"[
            {"id": "e", "broadcaster_id": "9", "game_name": "Just Chatting",
             "created_at": "2025-02-25T10:00:00Z", "duration": 15.0},
            {"id": "f", "broadcaster_id": "9", "game_id": "21779",
             "created_at": "2025-02-25T10:00:00Z", "duration": 15.0}
        ]"#,
        );
        let source = JsonFileSource::new(file.path());

        let clips = source
            .fetch(&SourceQuery::topic("509658", window()))
            .await
            .unwrap();
        let ids: Vec<_> = clips.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["e"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source
            .fetch(&SourceQuery::topic("1", window()))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::SourceError::Io(_)));
    }
}
