//! Configuration management for the Lector server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub tts: TtsConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Lifetime of presigned result links, in seconds
    pub presign_expiry_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Minio,
    R2,
    S3,
    B2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Base URL of the Vision-style annotate endpoint
    pub endpoint: String,
    /// Bearer token accepted from the environment; minting it is out of scope
    pub access_token: String,
    /// Optional language hint forwarded with each request
    pub language_hint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub endpoint: String,
    pub access_token: String,
    pub project_id: String,
    pub location: String,
    /// Voice name like "en-US-Wavenet-F"; the language code is derived from it
    pub voice: String,
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Explicit ffmpeg binary path; discovered on PATH when unset
    pub ffmpeg_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                provider: StorageProvider::Minio,
                endpoint: "http://localhost:9000".to_string(),
                bucket: "lector".to_string(),
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
                region: Some("us-east-1".to_string()),
                presign_expiry_secs: 86400,
            },
            ocr: OcrConfig {
                endpoint: "https://vision.googleapis.com".to_string(),
                access_token: String::new(),
                language_hint: None,
            },
            tts: TtsConfig {
                endpoint: "https://texttospeech.googleapis.com".to_string(),
                access_token: String::new(),
                project_id: String::new(),
                location: "us-central1".to_string(),
                voice: "en-US-Wavenet-F".to_string(),
                poll_interval_secs: 5,
                timeout_secs: 300,
            },
            audio: AudioConfig { ffmpeg_path: None },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            storage: StorageConfig {
                provider: match env::var("S3_PROVIDER")
                    .unwrap_or_else(|_| "minio".to_string())
                    .as_str()
                {
                    "r2" => StorageProvider::R2,
                    "s3" => StorageProvider::S3,
                    "b2" => StorageProvider::B2,
                    _ => StorageProvider::Minio,
                },
                endpoint: env::var("S3_ENDPOINT")?,
                bucket: env::var("S3_BUCKET")?,
                access_key: env::var("S3_ACCESS_KEY")?,
                secret_key: env::var("S3_SECRET_KEY")?,
                region: env::var("S3_REGION").ok(),
                presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                    .unwrap_or_else(|_| "86400".to_string())
                    .parse()
                    .unwrap_or(86400),
            },
            ocr: OcrConfig {
                endpoint: env::var("OCR_ENDPOINT")
                    .unwrap_or_else(|_| "https://vision.googleapis.com".to_string()),
                access_token: env::var("OCR_ACCESS_TOKEN").unwrap_or_default(),
                language_hint: env::var("OCR_LANGUAGE_HINT").ok(),
            },
            tts: TtsConfig {
                endpoint: env::var("TTS_ENDPOINT")
                    .unwrap_or_else(|_| "https://texttospeech.googleapis.com".to_string()),
                access_token: env::var("TTS_ACCESS_TOKEN").unwrap_or_default(),
                project_id: env::var("TTS_PROJECT_ID").unwrap_or_default(),
                location: env::var("TTS_LOCATION").unwrap_or_else(|_| "us-central1".to_string()),
                voice: env::var("VOICE_NAME").unwrap_or_else(|_| "en-US-Wavenet-F".to_string()),
                poll_interval_secs: env::var("TTS_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                timeout_secs: env::var("TTS_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            },
            audio: AudioConfig {
                ffmpeg_path: env::var("FFMPEG_PATH").ok(),
            },
        })
    }
}
