//! OCR providers
//!
//! Defines the provider trait the pipeline depends on and the Vision-style
//! HTTP implementation.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;

use crate::config::OcrConfig;

use super::types::{OcrError, TextAnnotation};

/// OCR provider seam
///
/// Implementations take raw document bytes and return the hierarchical
/// annotation. Bytes travel inline (base64) rather than by storage URI so
/// the seam works against any bucket backend.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Check whether the provider is usable (credentials present, etc.)
    fn is_available(&self) -> bool;

    /// Recognize a scanned document, returning its text layout hierarchy
    async fn recognize_document(
        &self,
        data: &[u8],
        language: Option<&str>,
    ) -> Result<TextAnnotation, OcrError>;
}

/// Vision-style document text detection over HTTP
pub struct VisionOcr {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl VisionOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnnotateResult {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiStatus {
    code: i64,
    message: String,
}

#[async_trait]
impl OcrProvider for VisionOcr {
    fn name(&self) -> &str {
        "vision"
    }

    fn is_available(&self) -> bool {
        !self.access_token.is_empty()
    }

    async fn recognize_document(
        &self,
        data: &[u8],
        language: Option<&str>,
    ) -> Result<TextAnnotation, OcrError> {
        let content = base64::engine::general_purpose::STANDARD.encode(data);

        let mut request = serde_json::json!({
            "requests": [{
                "image": { "content": content },
                "features": [{ "type": "DOCUMENT_TEXT_DETECTION" }]
            }]
        });
        if let Some(lang) = language {
            request["requests"][0]["imageContext"] =
                serde_json::json!({ "languageHints": [lang] });
        }

        let url = format!("{}/v1/images:annotate", self.endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api(format!("{}: {}", status, body)));
        }

        let body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

        let result = body.responses.into_iter().next().unwrap_or_default();
        if let Some(error) = result.error {
            return Err(OcrError::Api(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        // No annotation means no text detected, which is not an error
        Ok(result.full_text_annotation.unwrap_or_default())
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockOcr {
    pub annotation: TextAnnotation,
    pub available: bool,
}

#[cfg(test)]
#[async_trait]
impl OcrProvider for MockOcr {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize_document(
        &self,
        _data: &[u8],
        _language: Option<&str>,
    ) -> Result<TextAnnotation, OcrError> {
        Ok(self.annotation.clone())
    }
}
