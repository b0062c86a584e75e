//! Upload session — owns multipart-upload lifecycle state.

use std::sync::Arc;

use partflow_core::error::{AppError, ErrorKind};
use partflow_core::result::AppResult;
use partflow_core::traits::ObjectStoreClient;
use partflow_core::types::{CompletedPart, FinalizeOutcome, UploadRequestConfig, UploadTarget};

/// State of one in-progress multipart upload.
///
/// A session is owned exclusively by one sink for the duration of one
/// upload; mutation goes through `&mut self`, so the memoized upload ID
/// is computed at most once by construction rather than by locking.
/// [`UploadSession::finalize`] consumes the session, making the
/// finalized state terminal.
#[derive(Debug)]
pub struct UploadSession {
    /// Store client the initiate/finalize calls go through.
    client: Arc<dyn ObjectStoreClient>,
    /// Destination bucket and key.
    target: UploadTarget,
    /// Object metadata applied to every call in this session.
    request: UploadRequestConfig,
    /// Store-issued upload ID, obtained lazily and cached.
    upload_id: Option<String>,
    /// Next part number to hand out; starts at 1, never reused.
    part_counter: i32,
    /// Completed parts in order of arrival.
    completed_parts: Vec<CompletedPart>,
}

impl UploadSession {
    /// Create a session for one upload. No remote call is made yet; the
    /// initiate request is issued lazily by [`UploadSession::ensure_started`].
    pub fn new(
        client: Arc<dyn ObjectStoreClient>,
        target: UploadTarget,
        request: UploadRequestConfig,
    ) -> Self {
        Self {
            client,
            target,
            request,
            upload_id: None,
            part_counter: 1,
            completed_parts: Vec::new(),
        }
    }

    /// Return the upload ID, issuing the initiate request on first use.
    ///
    /// The initiate call is made at most once per session; subsequent
    /// calls return the cached ID. A rejected initiate is fatal to the
    /// whole upload.
    pub async fn ensure_started(&mut self) -> AppResult<String> {
        if let Some(id) = &self.upload_id {
            return Ok(id.clone());
        }

        let upload_id = self
            .client
            .initiate_upload(&self.target, &self.request)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::InitiateUpload,
                    format!("Failed to initiate multipart upload for {}", self.target),
                    e,
                )
            })?;

        tracing::debug!(
            target = %self.target,
            upload_id = %upload_id,
            "Initiated multipart upload"
        );

        self.upload_id = Some(upload_id.clone());
        Ok(upload_id)
    }

    /// Hand out the next sequential part number.
    ///
    /// Numbers start at 1 and advance by exactly 1 per call; a number is
    /// never recycled even when the part it was assigned to fails.
    pub fn next_part_number(&mut self) -> i32 {
        let n = self.part_counter;
        self.part_counter += 1;
        n
    }

    /// Record a completed part, preserving arrival order.
    ///
    /// Under strict sequential uploading the arrival order equals
    /// ascending part-number order.
    pub fn record(&mut self, part: CompletedPart) {
        self.completed_parts.push(part);
    }

    /// Parts recorded so far, in arrival order.
    pub fn completed_parts(&self) -> &[CompletedPart] {
        &self.completed_parts
    }

    /// Destination of this session.
    pub fn target(&self) -> &UploadTarget {
        &self.target
    }

    /// Complete the upload from all recorded parts.
    ///
    /// Issues the initiate call first if nothing forced it earlier, so an
    /// upload that produced zero parts still initiates and finalizes with
    /// an empty part list. Consumes the session; a rejected completion is
    /// fatal.
    pub async fn finalize(mut self) -> AppResult<FinalizeOutcome> {
        let upload_id = self.ensure_started().await?;

        // Arrival order already matches part-number order under strict
        // sequencing; sort anyway so the store-facing list is ordered by
        // construction.
        self.completed_parts.sort_by_key(|p| p.part_number);

        let outcome = self
            .client
            .complete_upload(&self.target, &upload_id, &self.completed_parts)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::FinalizeUpload,
                    format!(
                        "Failed to finalize multipart upload for {} ({} parts)",
                        self.target,
                        self.completed_parts.len()
                    ),
                    e,
                )
            })?;

        tracing::info!(
            target = %self.target,
            upload_id = %upload_id,
            parts = self.completed_parts.len(),
            "Finalized multipart upload"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::memory::InMemoryObjectStore;

    fn session(store: &Arc<InMemoryObjectStore>) -> UploadSession {
        UploadSession::new(
            Arc::clone(store) as Arc<dyn ObjectStoreClient>,
            UploadTarget::new("bucket", "key"),
            UploadRequestConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_ensure_started_is_memoized() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mut session = session(&store);

        let first = session.ensure_started().await.unwrap();
        let second = session.ensure_started().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.initiate_calls().await, 1);
    }

    #[tokio::test]
    async fn test_part_numbers_are_contiguous_from_one() {
        let store = Arc::new(InMemoryObjectStore::new());
        let mut session = session(&store);

        assert_eq!(session.next_part_number(), 1);
        assert_eq!(session.next_part_number(), 2);
        assert_eq!(session.next_part_number(), 3);
    }

    #[tokio::test]
    async fn test_finalize_with_no_parts_still_initiates() {
        let store = Arc::new(InMemoryObjectStore::new());
        let session = session(&store);

        let outcome = session.finalize().await.unwrap();

        assert_eq!(store.initiate_calls().await, 1);
        assert_eq!(store.complete_calls().await, 1);
        assert_eq!(outcome.bucket, "bucket");
        assert_eq!(
            store.object("bucket", "key").await.unwrap().len(),
            0,
            "empty upload materializes an empty object"
        );
    }
}
