//! Part uploader — one upload-part call per invocation.

use std::sync::Arc;

use bytes::Bytes;

use partflow_core::error::{AppError, ErrorKind};
use partflow_core::result::AppResult;
use partflow_core::traits::ObjectStoreClient;
use partflow_core::types::{CompletedPart, UploadRequestConfig, UploadTarget};

/// Performs single upload-part calls against the store.
///
/// The uploader does not retry and does not touch session state; the
/// caller records the returned [`CompletedPart`]. A failed call is fatal
/// to the whole upload and is propagated as-is.
#[derive(Debug, Clone)]
pub struct PartUploader {
    /// Store client the part uploads go through.
    client: Arc<dyn ObjectStoreClient>,
    /// Destination bucket and key.
    target: UploadTarget,
    /// Immutable per-session metadata carried on each part request.
    request: UploadRequestConfig,
}

impl PartUploader {
    /// Create a new part uploader for one session's target.
    pub fn new(
        client: Arc<dyn ObjectStoreClient>,
        target: UploadTarget,
        request: UploadRequestConfig,
    ) -> Self {
        Self {
            client,
            target,
            request,
        }
    }

    /// Upload one part and wrap the store's entity tag with the part number.
    pub async fn upload_part(
        &self,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
    ) -> AppResult<CompletedPart> {
        let size = body.len();

        let entity_tag = self
            .client
            .upload_part(&self.target, upload_id, part_number, body, &self.request)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::UploadPart,
                    format!(
                        "Failed to upload part {part_number} ({size} bytes) for {}",
                        self.target
                    ),
                    e,
                )
            })?;

        tracing::debug!(
            target = %self.target,
            part_number,
            bytes = size,
            entity_tag = %entity_tag,
            "Uploaded part"
        );

        Ok(CompletedPart::new(part_number, entity_tag))
    }
}
