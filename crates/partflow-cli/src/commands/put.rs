//! Streaming file upload CLI command.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tokio_util::io::ReaderStream;

use partflow_core::config::AppConfig;
use partflow_core::error::AppError;
use partflow_core::traits::{ByteStream, ObjectStoreClient};
use partflow_core::types::{UploadRequestConfig, UploadTarget};
use partflow_upload::client::s3::S3ObjectStore;
use partflow_upload::sink::StreamingUploadSink;

/// Arguments for the put command
#[derive(Debug, Args)]
pub struct PutArgs {
    /// Path to the file to upload
    pub file: PathBuf,

    /// Target bucket (defaults to the configured bucket)
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Target object key (defaults to the file name)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Override the MIME content type
    #[arg(long)]
    pub content_type: Option<String>,

    /// Canned ACL to apply (e.g. "private", "public-read")
    #[arg(long)]
    pub acl: Option<String>,
}

/// Execute the put command
pub async fn execute(args: &PutArgs, config: &AppConfig) -> Result<(), AppError> {
    if !args.file.exists() {
        return Err(AppError::validation(format!(
            "File not found: {}",
            args.file.display()
        )));
    }

    let bucket = args
        .bucket
        .clone()
        .unwrap_or_else(|| config.store.bucket.clone());
    if bucket.is_empty() {
        return Err(AppError::validation(
            "No bucket given (use --bucket or configure store.bucket)",
        ));
    }

    let key = args.key.clone().unwrap_or_else(|| {
        args.file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string()
    });

    let content_type = args
        .content_type
        .clone()
        .or_else(|| config.upload.default_content_type.clone())
        .unwrap_or_else(|| {
            mime_guess::from_path(&args.file)
                .first_or_octet_stream()
                .to_string()
        });

    let size = tokio::fs::metadata(&args.file)
        .await
        .map_err(|e| AppError::storage(format!("Failed to stat file: {e}")))?
        .len();

    let target = UploadTarget::new(bucket, key);
    println!(
        "Uploading '{}' ({} bytes) to {}...",
        args.file.display(),
        size,
        target
    );

    let request = UploadRequestConfig {
        content_type: Some(content_type),
        acl: args.acl.clone(),
        ..UploadRequestConfig::default()
    };

    let client: Arc<dyn ObjectStoreClient> =
        Arc::new(S3ObjectStore::from_config(&config.store).await);
    let sink = StreamingUploadSink::with_min_part_size(
        client,
        target,
        request,
        config.upload.min_part_size(),
    );

    let file = tokio::fs::File::open(&args.file)
        .await
        .map_err(|e| AppError::storage(format!("Failed to open file: {e}")))?;
    let stream: ByteStream = Box::pin(ReaderStream::with_capacity(file, 64 * 1024));

    let outcome = sink.consume(stream).await?;

    match outcome.location {
        Some(location) => println!("Uploaded to {}", location),
        None => println!("Uploaded to {}/{}", outcome.bucket, outcome.key),
    }
    Ok(())
}
