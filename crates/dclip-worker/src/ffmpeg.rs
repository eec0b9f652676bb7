//! Stream-copy concatenation through the ffmpeg concat demuxer.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{WorkerError, WorkerResult};

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> WorkerResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| WorkerError::media("ffmpeg not found in PATH"))
}

/// `ffmpeg -f concat -safe 0 -i <list> -c copy <output>`.
#[derive(Debug, Clone)]
pub struct ConcatCommand {
    list: PathBuf,
    output: PathBuf,
    log_level: String,
}

impl ConcatCommand {
    pub fn new(list: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            list: list.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            log_level: "error".to_string(),
        }
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-v".to_string(),
            self.log_level.clone(),
            "-f".to_string(),
            "concat".to_string(),
            "-safe".to_string(),
            "0".to_string(),
            "-i".to_string(),
            self.list.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            self.output.to_string_lossy().to_string(),
        ]
    }

    /// Run to completion, killing the process after `timeout`.
    pub async fn run(&self, timeout: Duration) -> WorkerResult<()> {
        let ffmpeg = check_ffmpeg()?;
        let args = self.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new(ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child.stderr.take();
        let waited = tokio::time::timeout(timeout, async {
            let mut message = String::new();
            if let Some(mut stderr) = stderr {
                stderr.read_to_string(&mut message).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, message))
        })
        .await;

        let output = match waited {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "FFmpeg timed out after {} seconds, killing process",
                    timeout.as_secs()
                );
                let _ = child.kill().await;
                return Err(WorkerError::media(format!(
                    "ffmpeg timed out after {} seconds",
                    timeout.as_secs()
                )));
            }
        };

        let (status, stderr) = output;
        if status.success() {
            info!(output = %self.output.display(), "Concatenated compilation");
            Ok(())
        } else {
            Err(WorkerError::media(format!(
                "ffmpeg exited with status {:?}: {}",
                status.code(),
                stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let args = ConcatCommand::new("/w/clips_list.txt", "/w/compiled.mp4").build_args();
        assert_eq!(
            args,
            vec![
                "-y",
                "-v",
                "error",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/w/clips_list.txt",
                "-c",
                "copy",
                "/w/compiled.mp4"
            ]
        );
    }

    #[test]
    fn test_log_level() {
        let args = ConcatCommand::new("a", "b").log_level("warning").build_args();
        assert_eq!(args[2], "warning");
    }
}
