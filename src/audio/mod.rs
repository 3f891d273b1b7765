//! Audio transcoding
//!
//! WAV → MP3 through an ffmpeg subprocess at a fixed quality setting. The
//! transform is a black box: bytes in, bytes out, stderr captured into the
//! error on failure.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

const MP3_BITRATE: &str = "192k";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to run {0}: {1}")]
    Spawn(String, String),

    #[error("ffmpeg exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
}

/// ffmpeg-based WAV → MP3 transcoder
pub struct Transcoder {
    ffmpeg_path: String,
}

impl Transcoder {
    /// Create a new transcoder, searching for ffmpeg on PATH
    pub fn new() -> Self {
        let ffmpeg_path = which::which("ffmpeg")
            .map_or_else(|_| "ffmpeg".to_string(), |p| p.to_string_lossy().to_string());
        Self { ffmpeg_path }
    }

    /// Specify custom ffmpeg binary path
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: &str) -> Self {
        self.ffmpeg_path = path.to_string();
        self
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    fn build_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-codec:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            MP3_BITRATE.to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Transcode a WAV file to MP3
    pub async fn wav_to_mp3(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let args = Self::build_args(input, output);
        tracing::debug!(ffmpeg = %self.ffmpeg_path, ?args, "transcoding WAV to MP3");

        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TranscodeError::Spawn(self.ffmpeg_path.clone(), e.to_string()))?;

        if !result.status.success() {
            return Err(TranscodeError::Failed {
                status: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(())
    }

    /// Check if ffmpeg is available
    pub async fn check_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new()
    }
}
