//! Document processing route
//!
//! `POST /api/v1/process` (and bare `POST /process` for compatibility):
//! takes a bucket-relative key, blocks until the pipeline completes, and
//! answers with the presigned MP3 link.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::pipeline;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub remote_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub audio_url: String,
    pub characters: u64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process", post(process))
        .route("/api/v1/process", post(process))
}

async fn process(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>> {
    validate_key(&request.remote_path)?;

    let outcome = pipeline::process_document(&state, &request.remote_path).await?;
    Ok(Json(ProcessResponse {
        audio_url: outcome.audio_url,
        characters: outcome.characters,
    }))
}

/// Storage keys are bucket-relative and must not escape the bucket.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(AppError::BadRequest(
            "remotePath must not be empty".to_string(),
        ));
    }
    if key.starts_with('/') {
        return Err(AppError::BadRequest(
            "remotePath must be bucket-relative".to_string(),
        ));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest(
            "remotePath must not contain '..' segments".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_normal_keys() {
        assert!(validate_key("input/book.pdf").is_ok());
        assert!(validate_key("book.epub").is_ok());
    }

    #[test]
    fn rejects_empty_keys() {
        assert!(matches!(validate_key(""), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_key("   "), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn rejects_absolute_keys() {
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_traversal_segments() {
        assert!(matches!(
            validate_key("../secrets.pdf"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_key("input/../../x.pdf"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn dotdot_inside_a_name_is_allowed() {
        assert!(validate_key("input/draft..final.pdf").is_ok());
    }
}
