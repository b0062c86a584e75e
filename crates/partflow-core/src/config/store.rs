//! Object store connection configuration.

use serde::{Deserialize, Serialize};

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct S3StoreConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Default S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID. Empty means the ambient credential chain is used.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}
