//! Request orchestration
//!
//! One document in, one presigned MP3 link out: download, extract (with the
//! OCR body-text fallback for scanned PDFs), quota gate, long-audio
//! synthesis into the bucket, WAV fetch, MP3 transcode, upload, cleanup,
//! presign.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::extract;
use crate::layout::{self, BodyBand};
use crate::ocr::{OcrProvider, TextAnnotation};
use crate::quota::QuotaDecision;
use crate::state::AppState;
use crate::storage::S3Client;

/// Result of a processed document
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub audio_url: String,
    pub characters: u64,
}

/// Working files and bucket intermediates for one request.
///
/// Everything tracked here is deleted best-effort when the request
/// finishes, success or failure; a missing file or an unreachable bucket
/// only logs.
#[derive(Default)]
struct Workspace {
    local: Vec<PathBuf>,
    wav_key: Option<String>,
}

impl Workspace {
    async fn cleanup(&self, storage: &S3Client) {
        for path in &self.local {
            let _ = tokio::fs::remove_file(path).await;
        }
        if let Some(key) = &self.wav_key {
            if let Err(e) = storage.delete_object(key).await {
                tracing::warn!(key = %key, "failed to delete intermediate WAV: {}", e);
            }
        }
    }
}

/// Run the full document-to-audio pipeline for one storage key.
pub async fn process_document(state: &AppState, remote_path: &str) -> Result<ProcessOutcome> {
    let mut workspace = Workspace::default();
    let result = run_stages(state, remote_path, &mut workspace).await;
    workspace.cleanup(state.storage()).await;
    result
}

async fn run_stages(
    state: &AppState,
    remote_path: &str,
    workspace: &mut Workspace,
) -> Result<ProcessOutcome> {
    let file_name = Path::new(remote_path)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(remote_path);
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("document");
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default();
    let id = Uuid::new_v4();

    // 1) fetch the input document
    tracing::info!(key = %remote_path, "fetching document");
    let object = state.storage().get_object(remote_path).await?;

    let work_dir = std::env::temp_dir();
    let local_in = work_dir.join(format!("lector-{}-{}", id, file_name));
    workspace.local.push(local_in.clone());
    tokio::fs::write(&local_in, &object.data).await?;

    // 2) extract raw text; blank PDFs fall back to OCR
    let raw = extract::extract_text(&local_in).await?;
    let text = if extension == "pdf" && raw.trim().is_empty() {
        tracing::info!(key = %remote_path, "no selectable text, falling back to OCR");
        let language = state.config().ocr.language_hint.clone();
        ocr_fallback_text(state.ocr(), &object.data, language.as_deref()).await?
    } else {
        raw
    };

    if text.trim().is_empty() {
        return Err(AppError::EmptyDocument);
    }

    // 3) quota gate, before any synthesis spend
    let characters = text.chars().count() as u64;
    match state.quota().check_and_update(characters).await {
        QuotaDecision::Allowed {
            remaining_daily,
            remaining_monthly,
        } => {
            tracing::info!(
                characters,
                remaining_daily,
                remaining_monthly,
                "quota check passed"
            );
        }
        QuotaDecision::Denied { message } => {
            return Err(AppError::QuotaExceeded(message));
        }
    }

    // 4) synthesize long-form audio into the bucket
    let wav_name = format!("{}-{}.wav", stem, id);
    let wav_key = format!("tmp/{}", wav_name);
    let wav_uri = state.storage().object_uri(&wav_key);
    workspace.wav_key = Some(wav_key.clone());
    state
        .synthesizer()
        .synthesize_long_audio(&text, &wav_uri)
        .await?;

    // 5) fetch the WAV and transcode to MP3
    let wav = state.storage().get_object(&wav_key).await?;
    let local_wav = work_dir.join(&wav_name);
    workspace.local.push(local_wav.clone());
    tokio::fs::write(&local_wav, &wav.data).await?;

    let mp3_name = format!("{}-{}.mp3", stem, id);
    let local_mp3 = work_dir.join(&mp3_name);
    workspace.local.push(local_mp3.clone());
    state.transcoder().wav_to_mp3(&local_wav, &local_mp3).await?;

    // 6) upload the MP3 and hand back a time-limited link
    let mp3_key = format!("output/{}", mp3_name);
    let mp3_data = tokio::fs::read(&local_mp3).await?;
    state
        .storage()
        .put_object(&mp3_key, mp3_data, "audio/mpeg")
        .await?;

    let expiry = Duration::from_secs(state.config().storage.presign_expiry_secs);
    let audio_url = state.storage().presign_get(&mp3_key, expiry).await?;

    tracing::info!(key = %mp3_key, characters, "document processed");
    Ok(ProcessOutcome {
        audio_url,
        characters,
    })
}

/// OCR fallback: recognize the document, then run the layout core
/// (flatten, cluster, filter) on the blocking pool.
pub async fn ocr_fallback_text(
    provider: &dyn OcrProvider,
    data: &[u8],
    language: Option<&str>,
) -> Result<String> {
    tracing::debug!(provider = provider.name(), "running OCR fallback");
    let annotation = provider.recognize_document(data, language).await?;

    tokio::task::spawn_blocking(move || body_text(&annotation))
        .await
        .map_err(|e| AppError::Internal(format!("layout task failed: {}", e)))
}

/// The core pipeline over one OCR result: flatten the hierarchy, cluster
/// word heights into size bands, keep the body band, join with spaces.
pub fn body_text(annotation: &TextAnnotation) -> String {
    let records = layout::flatten(annotation);
    let heights: Vec<f64> = records.iter().map(|r| r.height).collect();

    let breaks = layout::cluster_sizes(&heights, layout::DEFAULT_BANDS);
    let words = layout::filter_body_words(&records, &breaks, BodyBand::default());

    if words.is_empty() && !records.is_empty() {
        tracing::warn!(
            words_seen = records.len(),
            breaks = breaks.len(),
            "body-text filter produced no words from a non-empty OCR result"
        );
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StorageConfig, StorageProvider};

    async fn offline_storage() -> S3Client {
        S3Client::new(&StorageConfig {
            provider: StorageProvider::Minio,
            endpoint: "http://127.0.0.1:9".to_string(),
            bucket: "lector-test".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            region: None,
            presign_expiry_secs: 60,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn workspace_cleanup_removes_tracked_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = dir.path().join("in.pdf");
        let never_written = dir.path().join("out.wav");
        tokio::fs::write(&written, b"data").await.unwrap();

        let mut workspace = Workspace::default();
        workspace.local.push(written.clone());
        workspace.local.push(never_written.clone());
        // unreachable bucket: the delete fails and only logs
        workspace.wav_key = Some("tmp/book-1.wav".to_string());

        workspace.cleanup(&offline_storage().await).await;

        assert!(!written.exists());
        assert!(!never_written.exists());
    }

    #[tokio::test]
    async fn workspace_without_wav_key_skips_the_bucket() {
        let workspace = Workspace::default();
        // nothing tracked, nothing to delete; must not error or panic
        workspace.cleanup(&offline_storage().await).await;
    }
}
