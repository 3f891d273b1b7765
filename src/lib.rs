//! Lector Server
//!
//! A document-to-audiobook server: fetches a PDF or EPUB from S3-compatible
//! storage, extracts readable text (falling back to OCR with body-text
//! filtering for scanned PDFs), synthesizes long-form speech, transcodes the
//! result to MP3, and returns a presigned download link.
//!
//! # Modules
//!
//! - `layout`: the OCR body-text core (layout parser + size-band classifier)
//! - `extract`: native PDF/EPUB text extraction
//! - `ocr`, `tts`: HTTP collaborators behind provider traits
//! - `audio`: ffmpeg WAV → MP3 transcoding
//! - `quota`: storage-backed character quota ledger
//! - `pipeline`: per-request orchestration

use axum::Router;

pub mod audio;
pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod ocr;
pub mod pipeline;
pub mod quota;
pub mod routes;
pub mod state;
pub mod storage;
pub mod tts;

pub use state::AppState;

/// Assemble the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::process::router())
        .merge(routes::quota::router())
        .with_state(state)
}
