//! S3-compatible object storage

mod s3_client;
mod types;

pub use s3_client::S3Client;
pub use types::{ObjectMetadata, StorageObject};
