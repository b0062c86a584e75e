//! Object-store client trait for pluggable multipart-upload backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;
use crate::types::{CompletedPart, FinalizeOutcome, UploadRequestConfig, UploadTarget};

/// A byte stream type used for feeding chunked upload input.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for object stores that support multipart uploads.
///
/// The trait is defined here in `partflow-core` and implemented in
/// `partflow-upload` (in-memory store and the `s3`-gated AWS adapter).
/// Each operation is a single request/response call; retries, if any,
/// belong to the implementation's transport, not to callers.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync + std::fmt::Debug + 'static {
    /// Start a multipart upload and return the store-issued upload ID.
    async fn initiate_upload(
        &self,
        target: &UploadTarget,
        request: &UploadRequestConfig,
    ) -> AppResult<String>;

    /// Upload one part and return the store-issued entity tag.
    ///
    /// `part_number` is 1-based. The body may be any size; enforcing the
    /// protocol's minimum part size is the caller's concern.
    async fn upload_part(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
        request: &UploadRequestConfig,
    ) -> AppResult<String>;

    /// Complete a multipart upload from the given parts.
    ///
    /// `parts` must be ordered by ascending part number.
    async fn complete_upload(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> AppResult<FinalizeOutcome>;
}
