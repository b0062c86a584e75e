//! In-memory object store for tests and local development.
//!
//! Behaves like a real multipart store at the API level: upload IDs are
//! issued per initiate call, parts are validated by entity tag at
//! complete time, and the assembled object only exists after a
//! successful complete.

use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::sync::Mutex;
use uuid::Uuid;

use partflow_core::error::AppError;
use partflow_core::result::AppResult;
use partflow_core::traits::ObjectStoreClient;
use partflow_core::types::{CompletedPart, FinalizeOutcome, UploadRequestConfig, UploadTarget};

/// An in-memory [`ObjectStoreClient`].
///
/// Exposes call counters and the stored objects so tests can assert on
/// exactly which store operations were performed.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Open multipart uploads keyed by upload ID.
    uploads: HashMap<String, PendingUpload>,
    /// Finished objects keyed by (bucket, key).
    objects: HashMap<(String, String), Bytes>,
    /// Part lists accepted by successful complete calls.
    completed: HashMap<(String, String), Vec<CompletedPart>>,
    initiate_calls: usize,
    complete_calls: usize,
}

#[derive(Debug)]
struct PendingUpload {
    target: UploadTarget,
    parts: BTreeMap<i32, StoredPart>,
}

#[derive(Debug)]
struct StoredPart {
    entity_tag: String,
    body: Bytes,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a finished object, if a complete call produced one.
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        let state = self.state.lock().await;
        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// The part list a successful complete call accepted for an object.
    pub async fn completed_parts(&self, bucket: &str, key: &str) -> Option<Vec<CompletedPart>> {
        let state = self.state.lock().await;
        state
            .completed
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Number of initiate calls issued so far.
    pub async fn initiate_calls(&self) -> usize {
        self.state.lock().await.initiate_calls
    }

    /// Number of complete calls issued so far.
    pub async fn complete_calls(&self) -> usize {
        self.state.lock().await.complete_calls
    }

    /// Number of multipart uploads still open (initiated, not completed).
    pub async fn open_uploads(&self) -> usize {
        self.state.lock().await.uploads.len()
    }
}

/// Deterministic stand-in for a store-computed entity tag.
fn entity_tag_for(part_number: i32, body: &[u8]) -> String {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    part_number.hash(&mut hasher);
    body.hash(&mut hasher);
    format!("\"{:016x}\"", hasher.finish())
}

#[async_trait]
impl ObjectStoreClient for InMemoryObjectStore {
    async fn initiate_upload(
        &self,
        target: &UploadTarget,
        _request: &UploadRequestConfig,
    ) -> AppResult<String> {
        let mut state = self.state.lock().await;
        state.initiate_calls += 1;

        let upload_id = Uuid::new_v4().to_string();
        state.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                target: target.clone(),
                parts: BTreeMap::new(),
            },
        );
        Ok(upload_id)
    }

    async fn upload_part(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
        _request: &UploadRequestConfig,
    ) -> AppResult<String> {
        if part_number < 1 {
            return Err(AppError::validation(format!(
                "Part number must be positive, got {part_number}"
            )));
        }

        let mut state = self.state.lock().await;
        let upload = state.uploads.get_mut(upload_id).ok_or_else(|| {
            AppError::validation(format!("Unknown upload ID '{upload_id}' for {target}"))
        })?;

        let entity_tag = entity_tag_for(part_number, &body);
        // Re-uploading the same part number overwrites, as real stores do.
        upload.parts.insert(
            part_number,
            StoredPart {
                entity_tag: entity_tag.clone(),
                body,
            },
        );
        Ok(entity_tag)
    }

    async fn complete_upload(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> AppResult<FinalizeOutcome> {
        let mut state = self.state.lock().await;
        state.complete_calls += 1;

        let upload = state.uploads.remove(upload_id).ok_or_else(|| {
            AppError::validation(format!("Unknown upload ID '{upload_id}' for {target}"))
        })?;

        let mut assembled = BytesMut::new();
        let mut previous = 0;
        for part in parts {
            if part.part_number <= previous {
                return Err(AppError::validation(format!(
                    "Part list not in ascending order at part {}",
                    part.part_number
                )));
            }
            previous = part.part_number;

            let stored = upload.parts.get(&part.part_number).ok_or_else(|| {
                AppError::validation(format!(
                    "Part {} was never uploaded for upload '{upload_id}'",
                    part.part_number
                ))
            })?;
            if stored.entity_tag != part.entity_tag {
                return Err(AppError::validation(format!(
                    "Entity tag mismatch for part {}",
                    part.part_number
                )));
            }
            assembled.extend_from_slice(&stored.body);
        }

        let total_bytes = assembled.len();
        let object_key = (upload.target.bucket.clone(), upload.target.key.clone());
        state.objects.insert(object_key.clone(), assembled.freeze());
        state.completed.insert(object_key, parts.to_vec());

        Ok(FinalizeOutcome {
            bucket: upload.target.bucket,
            key: upload.target.key,
            location: Some(format!("memory://{}/{}", target.bucket, target.key)),
            entity_tag: Some(format!("\"{}-{total_bytes}\"", parts.len())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_rejects_unknown_upload_id() {
        let store = InMemoryObjectStore::new();
        let target = UploadTarget::new("b", "k");

        let err = store
            .complete_upload(&target, "no-such-upload", &[])
            .await
            .unwrap_err();
        assert!(err.message.contains("Unknown upload ID"));
    }

    #[tokio::test]
    async fn test_complete_rejects_entity_tag_mismatch() {
        let store = InMemoryObjectStore::new();
        let target = UploadTarget::new("b", "k");
        let request = UploadRequestConfig::default();

        let upload_id = store.initiate_upload(&target, &request).await.unwrap();
        store
            .upload_part(&target, &upload_id, 1, Bytes::from_static(b"data"), &request)
            .await
            .unwrap();

        let wrong = CompletedPart::new(1, "\"bogus\"");
        let err = store
            .complete_upload(&target, &upload_id, &[wrong])
            .await
            .unwrap_err();
        assert!(err.message.contains("Entity tag mismatch"));
    }

    #[tokio::test]
    async fn test_assembles_parts_in_given_order() {
        let store = InMemoryObjectStore::new();
        let target = UploadTarget::new("b", "k");
        let request = UploadRequestConfig::default();

        let upload_id = store.initiate_upload(&target, &request).await.unwrap();
        let tag1 = store
            .upload_part(&target, &upload_id, 1, Bytes::from_static(b"hello "), &request)
            .await
            .unwrap();
        let tag2 = store
            .upload_part(&target, &upload_id, 2, Bytes::from_static(b"world"), &request)
            .await
            .unwrap();

        let parts = vec![CompletedPart::new(1, tag1), CompletedPart::new(2, tag2)];
        let outcome = store
            .complete_upload(&target, &upload_id, &parts)
            .await
            .unwrap();

        assert_eq!(outcome.bucket, "b");
        assert_eq!(store.object("b", "k").await.unwrap(), "hello world");
        assert_eq!(store.open_uploads().await, 0);
    }
}
