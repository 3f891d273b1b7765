//! Long-audio speech synthesis
//!
//! The synthesizer seam the pipeline calls through, plus the HTTP client for
//! a `synthesizeLongAudio`-style long-running operation: start the
//! operation, then poll it until `done`, bounded by an overall deadline.
//! The audio lands at a caller-supplied storage URI as LINEAR16 WAV.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::TtsConfig;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS request failed: {0}")]
    Http(String),

    #[error("TTS API error: {0}")]
    Api(String),

    #[error("Synthesis operation failed: {message} (code {code})")]
    Operation { code: i64, message: String },

    #[error("Synthesis did not complete within {0}s")]
    DeadlineExceeded(u64),

    #[error("Invalid TTS response: {0}")]
    InvalidResponse(String),
}

/// Speech synthesizer seam
///
/// Implementations resolve once the synthesized audio exists at
/// `output_uri`. Character accounting is the caller's job: the spent amount
/// is the `char` count of the input text.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizer name for logs
    fn name(&self) -> &str;

    /// Synthesize `text` as long-form audio written to `output_uri`
    async fn synthesize_long_audio(&self, text: &str, output_uri: &str) -> Result<(), TtsError>;
}

/// Derive the language code from a voice name: the first two dash-separated
/// segments ("en-US-Wavenet-F" → "en-US").
pub fn language_code(voice: &str) -> String {
    voice.split('-').take(2).collect::<Vec<_>>().join("-")
}

/// HTTP client for the long-audio synthesis operation protocol
pub struct LongAudioClient {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    project_id: String,
    location: String,
    voice: String,
    poll_interval: Duration,
    timeout: Duration,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Operation {
    name: String,
    done: bool,
    error: Option<OperationError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OperationError {
    code: i64,
    message: String,
}

impl LongAudioClient {
    pub fn new(config: &TtsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            voice: config.voice.clone(),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn build_request(&self, text: &str, output_uri: &str) -> serde_json::Value {
        serde_json::json!({
            "input": { "text": text },
            "voice": {
                "languageCode": language_code(&self.voice),
                "name": self.voice,
            },
            "audioConfig": { "audioEncoding": "LINEAR16" },
            "outputGcsUri": output_uri,
        })
    }

    async fn fetch_operation(&self, name: &str) -> Result<Operation, TtsError> {
        let url = format!("{}/v1beta1/{}", self.endpoint, name);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| TtsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Api(format!("{}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SpeechSynthesizer for LongAudioClient {
    fn name(&self) -> &str {
        "long-audio"
    }

    async fn synthesize_long_audio(&self, text: &str, output_uri: &str) -> Result<(), TtsError> {
        let parent = format!(
            "projects/{}/locations/{}",
            self.project_id, self.location
        );
        let url = format!("{}/v1beta1/{}:synthesizeLongAudio", self.endpoint, parent);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&self.build_request(text, output_uri))
            .send()
            .await
            .map_err(|e| TtsError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Api(format!("{}: {}", status, body)));
        }

        let operation: Operation = response
            .json()
            .await
            .map_err(|e| TtsError::InvalidResponse(e.to_string()))?;
        if operation.name.is_empty() {
            return Err(TtsError::InvalidResponse(
                "operation name missing".to_string(),
            ));
        }

        tracing::info!(
            operation = %operation.name,
            characters = text.chars().count(),
            voice = %self.voice,
            "long-audio synthesis started"
        );

        let deadline = Instant::now() + self.timeout;
        loop {
            let current = self.fetch_operation(&operation.name).await?;
            if let Some(error) = current.error {
                return Err(TtsError::Operation {
                    code: error.code,
                    message: error.message,
                });
            }
            if current.done {
                tracing::info!(operation = %operation.name, "long-audio synthesis finished");
                return Ok(());
            }
            if Instant::now() + self.poll_interval > deadline {
                return Err(TtsError::DeadlineExceeded(self.timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TtsConfig;

    fn client() -> LongAudioClient {
        LongAudioClient::new(&TtsConfig {
            endpoint: "https://texttospeech.googleapis.com".into(),
            access_token: "token".into(),
            project_id: "proj".into(),
            location: "us-central1".into(),
            voice: "en-US-Wavenet-F".into(),
            poll_interval_secs: 5,
            timeout_secs: 300,
        })
    }

    #[test]
    fn language_code_is_first_two_voice_segments() {
        assert_eq!(language_code("en-US-Wavenet-F"), "en-US");
        assert_eq!(language_code("sv-SE-Standard-A"), "sv-SE");
        assert_eq!(language_code("en"), "en");
    }

    #[test]
    fn request_body_carries_voice_and_output_uri() {
        let body = client().build_request("hello world", "s3://bucket/tmp/a.wav");
        assert_eq!(body["input"]["text"], "hello world");
        assert_eq!(body["voice"]["languageCode"], "en-US");
        assert_eq!(body["voice"]["name"], "en-US-Wavenet-F");
        assert_eq!(body["audioConfig"]["audioEncoding"], "LINEAR16");
        assert_eq!(body["outputGcsUri"], "s3://bucket/tmp/a.wav");
    }

    #[test]
    fn operation_error_is_parsed() {
        let op: Operation = serde_json::from_str(
            r#"{"name": "projects/p/operations/1", "done": true,
                "error": {"code": 8, "message": "quota"}}"#,
        )
        .unwrap();
        assert!(op.done);
        let error = op.error.unwrap();
        assert_eq!(error.code, 8);
        assert_eq!(error.message, "quota");
    }

    #[test]
    fn pending_operation_defaults_to_not_done() {
        let op: Operation =
            serde_json::from_str(r#"{"name": "projects/p/operations/1"}"#).unwrap();
        assert!(!op.done);
        assert!(op.error.is_none());
    }
}
