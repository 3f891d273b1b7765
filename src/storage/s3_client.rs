//! S3-compatible storage client
//!
//! Wraps the AWS SDK for S3-compatible storage access (MinIO, R2, B2, AWS).

use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use chrono::DateTime;

use crate::config::StorageConfig;
use crate::error::{AppError, Result, StorageError};

use super::types::{ObjectMetadata, StorageObject};

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
}

impl S3Client {
    /// Create a new S3 client from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "lector",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and other S3-compatible services
            .build();

        let client = Client::from_conf(s3_config);

        // Test connection by checking if bucket exists
        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        Ok(Self { client, bucket })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Storage URI for a key, for collaborators that address storage directly
    pub fn object_uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    /// Get object metadata (HEAD request)
    pub async fn head_object(&self, key: &str) -> Result<ObjectMetadata> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") {
                    AppError::Storage(StorageError::ObjectNotFound(key.to_string()))
                } else {
                    AppError::Storage(StorageError::SdkError(format!(
                        "Failed to head object {}: {}",
                        key, e
                    )))
                }
            })?;

        Ok(ObjectMetadata {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            last_modified: response
                .last_modified()
                .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
            content_type: response.content_type().map(|s| s.to_string()),
            etag: response.e_tag().map(|s| s.to_string()),
        })
    }

    /// Get an object's data
    pub async fn get_object(&self, key: &str) -> Result<StorageObject> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") {
                    AppError::Storage(StorageError::ObjectNotFound(key.to_string()))
                } else {
                    AppError::Storage(StorageError::SdkError(format!(
                        "Failed to get object {}: {}",
                        key, e
                    )))
                }
            })?;

        let metadata = ObjectMetadata {
            key: key.to_string(),
            size: response.content_length().unwrap_or(0),
            last_modified: response
                .last_modified()
                .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
            content_type: response.content_type().map(|s| s.to_string()),
            etag: response.e_tag().map(|s| s.to_string()),
        };

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(StorageObject { metadata, data })
    }

    /// Store an object
    pub async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                StorageError::SdkError(format!("Failed to put object {}: {}", key, e))
            })?;

        Ok(())
    }

    /// Delete an object
    pub async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                StorageError::SdkError(format!("Failed to delete object {}: {}", key, e))
            })?;

        Ok(())
    }

    /// Check if an object exists
    pub async fn object_exists(&self, key: &str) -> Result<bool> {
        match self.head_object(key).await {
            Ok(_) => Ok(true),
            Err(AppError::Storage(StorageError::ObjectNotFound(_))) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Issue a time-limited download URL for an object
    pub async fn presign_get(&self, key: &str, expires: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires).map_err(|e| {
            StorageError::SdkError(format!("Invalid presign expiry: {}", e))
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                StorageError::SdkError(format!("Failed to presign GET for {}: {}", key, e))
            })?;

        Ok(request.uri().to_string())
    }

    /// Issue a time-limited upload URL for an object
    pub async fn presign_put(&self, key: &str, expires: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires).map_err(|e| {
            StorageError::SdkError(format!("Invalid presign expiry: {}", e))
        })?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                StorageError::SdkError(format!("Failed to presign PUT for {}: {}", key, e))
            })?;

        Ok(request.uri().to_string())
    }
}
