//! Render manifests derived from a committed plan.
//!
//! Everything here reads the plan's stored offsets; nothing re-adds
//! durations, so captions, the concat order and the chapter list always
//! agree with the plan.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use dclip_models::format_caption_timestamp;
use dclip_planner::{CompilationPlan, PlanEntry};

use crate::error::WorkerResult;

pub const CONCAT_LIST_FILE: &str = "clips_list.txt";
pub const CAPTIONS_FILE: &str = "captions.srt";
pub const DOWNLOADS_FILE: &str = "downloads.json";

/// Where a clip is expected on disk and where to fetch it from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipDownload {
    pub position: usize,
    pub id: String,
    pub source_url: String,
    pub path: PathBuf,
}

/// Paths of the written manifest files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderManifest {
    pub concat_list: PathBuf,
    pub captions: PathBuf,
    pub downloads: PathBuf,
    pub clips: Vec<ClipDownload>,
}

/// File name for the clip at `position` (zero-based) in the plan.
pub fn clip_file_name(position: usize, entry: &PlanEntry) -> String {
    let id: String = entry
        .candidate()
        .id()
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("clip_{}_{}.mp4", position + 1, id)
}

/// Quote a path for an ffmpeg concat list line.
fn quote_concat_path(path: &Path) -> String {
    format!("'{}'", path.to_string_lossy().replace('\'', "'\\''"))
}

/// Expected local file for every entry, in plan order.
pub fn clip_downloads(plan: &CompilationPlan, clips_dir: &Path) -> Vec<ClipDownload> {
    plan.entries()
        .iter()
        .enumerate()
        .map(|(position, entry)| ClipDownload {
            position,
            id: entry.candidate().id().to_string(),
            source_url: entry.candidate().source_url().to_string(),
            path: clips_dir.join(clip_file_name(position, entry)),
        })
        .collect()
}

/// ffmpeg concat demuxer input, one `file` line per entry.
pub fn concat_list(clips: &[ClipDownload]) -> String {
    clips
        .iter()
        .map(|clip| format!("file {}\n", quote_concat_path(&clip.path)))
        .collect()
}

/// SRT captions: one cue per entry over `[start, start + duration)`.
pub fn captions_srt(plan: &CompilationPlan) -> String {
    let mut out = String::new();
    for (i, entry) in plan.entries().iter().enumerate() {
        let candidate = entry.candidate();
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n{}\n\n",
            i + 1,
            format_caption_timestamp(entry.start_offset_seconds()),
            format_caption_timestamp(entry.end_offset_seconds()),
            candidate.display_title(),
            candidate.display_publisher(),
        ));
    }
    out
}

/// Write the concat list, captions and download list into `work_dir`.
pub async fn write_manifest(
    plan: &CompilationPlan,
    work_dir: &Path,
    clips_dir: &Path,
) -> WorkerResult<RenderManifest> {
    tokio::fs::create_dir_all(work_dir).await?;

    let clips = clip_downloads(plan, clips_dir);
    let manifest = RenderManifest {
        concat_list: work_dir.join(CONCAT_LIST_FILE),
        captions: work_dir.join(CAPTIONS_FILE),
        downloads: work_dir.join(DOWNLOADS_FILE),
        clips,
    };

    tokio::fs::write(&manifest.concat_list, concat_list(&manifest.clips)).await?;
    tokio::fs::write(&manifest.captions, captions_srt(plan)).await?;
    tokio::fs::write(
        &manifest.downloads,
        serde_json::to_vec_pretty(&manifest.clips)?,
    )
    .await?;

    debug!(
        entries = manifest.clips.len(),
        concat_list = %manifest.concat_list.display(),
        "Wrote render manifest"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dclip_models::ClipCandidate;
    use dclip_planner::PlaylistCommitter;

    fn plan() -> CompilationPlan {
        PlaylistCommitter::new(1.0e6, 1)
            .commit(vec![
                ClipCandidate::new("AwkwardSalamander", "1", 28.5)
                    .with_title("babymetal")
                    .with_publisher_name("Chewie"),
                ClipCandidate::new("weird/id's", "2", 61.25).with_title("second"),
            ])
            .plan
    }

    #[test]
    fn test_clip_file_names_are_safe() {
        let plan = plan();
        assert_eq!(clip_file_name(0, &plan.entries()[0]), "clip_1_AwkwardSalamander.mp4");
        assert_eq!(clip_file_name(1, &plan.entries()[1]), "clip_2_weird_id_s.mp4");
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let clips = vec![ClipDownload {
            position: 0,
            id: "x".into(),
            source_url: String::new(),
            path: PathBuf::from("/data/it's here/clip_1_x.mp4"),
        }];
        assert_eq!(concat_list(&clips), "file '/data/it'\\''s here/clip_1_x.mp4'\n");
    }

    #[test]
    fn test_captions_follow_plan_offsets() {
        let srt = captions_srt(&plan());
        let expected = "1\n00:00:00,000 --> 00:00:28,500\nbabymetal\nChewie\n\n\
                        2\n00:00:28,500 --> 00:01:29,750\nsecond\n2\n\n";
        assert_eq!(srt, expected);
    }

    #[test]
    fn test_empty_plan_has_empty_manifests() {
        let empty = CompilationPlan::empty();
        assert_eq!(captions_srt(&empty), "");
        assert!(clip_downloads(&empty, Path::new("/clips")).is_empty());
    }

    #[tokio::test]
    async fn test_write_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let clips_dir = dir.path().join("clips");
        let manifest = write_manifest(&plan(), dir.path(), &clips_dir).await.unwrap();

        let list = std::fs::read_to_string(&manifest.concat_list).unwrap();
        assert_eq!(list.lines().count(), 2);
        assert!(list.starts_with("file '"));
        assert!(manifest.captions.exists());
        assert_eq!(manifest.clips[1].path, clips_dir.join("clip_2_weird_id_s.mp4"));
    }
}
