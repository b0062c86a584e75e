//! Streaming upload sink — the consumer-facing entry point.

use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;

use partflow_core::error::{AppError, ErrorKind};
use partflow_core::result::AppResult;
use partflow_core::traits::{ByteStream, ObjectStoreClient};
use partflow_core::types::{FinalizeOutcome, UploadRequestConfig, UploadTarget};

use crate::buffer::{MIN_PART_SIZE, PartBuffer};
use crate::session::UploadSession;
use crate::uploader::PartUploader;

/// Drives one multipart upload from an incoming chunk stream.
///
/// Each chunk is appended to the part buffer; whenever the buffer yields
/// a full part it is uploaded before the next chunk is accepted, so
/// parts reach the store strictly in input order and exactly one part
/// upload is ever in flight. The first error from any step abandons the
/// upload: no finalize call is made and the already-opened remote upload
/// is left to the store's expiry policy.
#[derive(Debug)]
pub struct StreamingUploadSink {
    buffer: PartBuffer,
    uploader: PartUploader,
    session: UploadSession,
}

impl StreamingUploadSink {
    /// Create a sink with the protocol-minimum part size (5 MiB).
    pub fn new(
        client: Arc<dyn ObjectStoreClient>,
        target: UploadTarget,
        request: UploadRequestConfig,
    ) -> Self {
        Self::with_min_part_size(client, target, request, MIN_PART_SIZE)
    }

    /// Create a sink with a custom part-size threshold.
    ///
    /// Thresholds below 5 MiB are only valid against stores with smaller
    /// limits (or in tests).
    pub fn with_min_part_size(
        client: Arc<dyn ObjectStoreClient>,
        target: UploadTarget,
        request: UploadRequestConfig,
        min_part_size: usize,
    ) -> Self {
        Self {
            buffer: PartBuffer::with_min_part_size(min_part_size),
            uploader: PartUploader::new(Arc::clone(&client), target.clone(), request.clone()),
            session: UploadSession::new(client, target, request),
        }
    }

    /// Feed one chunk into the upload.
    ///
    /// Awaits the part upload when the chunk fills the buffer; callers
    /// must not feed the next chunk until this resolves, which the
    /// `&mut self` receiver enforces.
    pub async fn push(&mut self, chunk: &[u8]) -> AppResult<()> {
        if let Some(part) = self.buffer.append(chunk) {
            self.upload_full_part(part).await?;
        }
        Ok(())
    }

    /// Finish the upload: flush the residual part, then finalize.
    ///
    /// An upload that never produced a single byte still initiates and
    /// finalizes with an empty part list.
    pub async fn finish(mut self) -> AppResult<FinalizeOutcome> {
        if let Some(residual) = self.buffer.flush() {
            self.upload_full_part(residual).await?;
        }
        self.session.finalize().await
    }

    /// Drain an entire chunk stream and finalize.
    ///
    /// Chunks are consumed one at a time; the next chunk is not polled
    /// while a part upload is outstanding. The first failure — from the
    /// input stream or from any store call — is surfaced as-is and no
    /// finalize is attempted.
    pub async fn consume(mut self, mut stream: ByteStream) -> AppResult<FinalizeOutcome> {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Input stream failed for {}", self.session.target()),
                    e,
                )
            })?;
            self.push(&chunk).await?;
        }
        self.finish().await
    }

    /// Upload one full part: assign the number, upload, record.
    async fn upload_full_part(&mut self, body: Bytes) -> AppResult<()> {
        let upload_id = self.session.ensure_started().await?;
        let part_number = self.session.next_part_number();
        let part = self.uploader.upload_part(&upload_id, part_number, body).await?;
        self.session.record(part);
        Ok(())
    }
}
