//! OCR collaborator
//!
//! Hierarchical text-annotation types mirroring the document-text-detection
//! wire format, and the provider seam the pipeline calls through.

pub mod provider;
pub mod types;

pub use provider::{OcrProvider, VisionOcr};
pub use types::{OcrError, TextAnnotation};
