//! Error types for the Lector server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::audio::TranscodeError;
use crate::extract::ExtractError;
use crate::ocr::OcrError;
use crate::tts::TtsError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No readable text found in document")]
    EmptyDocument,

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("S3 error: {0}")]
    Storage(#[from] StorageError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Speech synthesis error: {0}")]
    Tts(#[from] TtsError),

    #[error("Transcode error: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("S3 SDK error: {0}")]
    SdkError(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::EmptyDocument => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_document",
                "No readable text found in document".to_string(),
            ),
            AppError::QuotaExceeded(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, "quota_exceeded", msg.clone())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                match e {
                    StorageError::ObjectNotFound(key) => (
                        StatusCode::NOT_FOUND,
                        "not_found",
                        format!("Object not found: {}", key),
                    ),
                    StorageError::BucketNotFound(bucket) => (
                        StatusCode::NOT_FOUND,
                        "not_found",
                        format!("Bucket not found: {}", bucket),
                    ),
                    StorageError::AccessDenied(_) => (
                        StatusCode::FORBIDDEN,
                        "access_denied",
                        "Access denied".to_string(),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "storage_error",
                        "Storage error".to_string(),
                    ),
                }
            }
            AppError::Extract(e) => match e {
                ExtractError::UnsupportedFormat(ext) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "unsupported_format",
                    format!("Unsupported extension: {}", ext),
                ),
                _ => {
                    tracing::error!("Extraction error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "extract_error",
                        "Text extraction failed".to_string(),
                    )
                }
            },
            AppError::Ocr(e) => {
                tracing::error!("OCR error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "ocr_error",
                    "OCR service error".to_string(),
                )
            }
            AppError::Tts(e) => {
                tracing::error!("TTS error: {}", e);
                match e {
                    TtsError::DeadlineExceeded(_) => (
                        StatusCode::GATEWAY_TIMEOUT,
                        "tts_timeout",
                        "Speech synthesis did not complete in time".to_string(),
                    ),
                    _ => (
                        StatusCode::BAD_GATEWAY,
                        "tts_error",
                        "Speech synthesis error".to_string(),
                    ),
                }
            }
            AppError::Transcode(e) => {
                tracing::error!("Transcode error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "transcode_error",
                    "Audio transcoding failed".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "IO error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exceeded_maps_to_429() {
        let response = AppError::QuotaExceeded("Daily quota exceeded".into()).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn empty_document_maps_to_422() {
        let response = AppError::EmptyDocument.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unsupported_format_maps_to_415() {
        let response =
            AppError::Extract(ExtractError::UnsupportedFormat(".txt".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn missing_object_maps_to_404() {
        let response =
            AppError::Storage(StorageError::ObjectNotFound("input/x.pdf".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn tts_deadline_maps_to_504() {
        let response = AppError::Tts(TtsError::DeadlineExceeded(300)).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
