//! Native text extraction
//!
//! Direct library calls for documents with selectable text: `pdf-extract`
//! for PDF, an `EpubDoc` spine walk rendered through `html2text` for EPUB.
//! A PDF whose extracted text is blank is the pipeline's OCR-fallback
//! trigger; this module only reports the blank text, the pipeline decides.

use std::ffi::OsStr;
use std::path::Path;

use epub::doc::EpubDoc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported extension: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("EPUB extraction failed: {0}")]
    Epub(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Extract text from a local document, dispatching on the lower-cased file
/// extension. Runs on the blocking pool; the library calls are CPU-bound.
pub async fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let path = path.to_owned();
    tokio::task::spawn_blocking(move || extract_text_sync(&path))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Synchronous extension dispatch
pub fn extract_text_sync(path: &Path) -> Result<String, ExtractError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string())),
        "epub" => extract_epub(path),
        other => Err(ExtractError::UnsupportedFormat(format!(".{}", other))),
    }
}

/// Walk the EPUB spine, strip markup from each chapter, join chapters with
/// blank lines.
fn extract_epub(path: &Path) -> Result<String, ExtractError> {
    let mut doc = EpubDoc::new(path).map_err(|e| ExtractError::Epub(e.to_string()))?;

    let mut chapters = Vec::new();
    loop {
        if let Some((content, _mime)) = doc.get_current_str() {
            let plain = html2text::from_read(content.as_bytes(), 80);
            if !plain.trim().is_empty() {
                chapters.push(plain);
            }
        }
        if !doc.go_next() {
            break;
        }
    }

    Ok(chapters.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn unknown_extension_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "plain text").unwrap();

        let err = extract_text(file.path()).await.unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == ".txt"));
    }

    #[test]
    fn missing_extension_is_rejected() {
        let err = extract_text_sync(Path::new("/tmp/no-extension")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        // an unreadable path still reaches the PDF branch, proving dispatch
        let err = extract_text_sync(Path::new("/nonexistent/book.PDF")).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
