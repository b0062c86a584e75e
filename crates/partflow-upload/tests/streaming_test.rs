//! End-to-end tests for the streaming upload sink against the in-memory
//! object store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use partflow_core::error::ErrorKind;
use partflow_core::result::AppResult;
use partflow_core::traits::{ByteStream, ObjectStoreClient};
use partflow_core::types::{CompletedPart, FinalizeOutcome, UploadRequestConfig, UploadTarget};
use partflow_upload::client::memory::InMemoryObjectStore;
use partflow_upload::sink::StreamingUploadSink;

const MIB: usize = 1024 * 1024;

fn target() -> UploadTarget {
    UploadTarget::new("test-bucket", "path/to/object")
}

fn sink_with_min(store: &Arc<InMemoryObjectStore>, min_part_size: usize) -> StreamingUploadSink {
    StreamingUploadSink::with_min_part_size(
        Arc::clone(store) as Arc<dyn ObjectStoreClient>,
        target(),
        UploadRequestConfig::default(),
        min_part_size,
    )
}

fn chunk_stream(chunks: Vec<&'static [u8]>) -> ByteStream {
    Box::pin(futures::stream::iter(
        chunks
            .into_iter()
            .map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c))),
    ))
}

#[tokio::test]
async fn test_sub_threshold_chunks_become_one_flush_part() {
    let store = Arc::new(InMemoryObjectStore::new());
    let sink = sink_with_min(&store, 32);

    sink.consume(chunk_stream(vec![b"abc", b"def", b"ghi"]))
        .await
        .unwrap();

    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].part_number, 1);
    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap(),
        "abcdefghi"
    );
}

#[tokio::test]
async fn test_exact_multiple_produces_no_flush_part() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = sink_with_min(&store, 4);

    // Each push crosses the threshold exactly; nothing remains to flush.
    for _ in 0..3 {
        sink.push(b"wxyz").await.unwrap();
    }
    sink.finish().await.unwrap();

    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap(),
        "wxyzwxyzwxyz"
    );
}

#[tokio::test]
async fn test_part_numbers_are_contiguous_ascending() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = sink_with_min(&store, 8);

    for byte in 0u8..5 {
        sink.push(&[byte; 8]).await.unwrap();
    }
    sink.push(b"rest").await.unwrap();
    sink.finish().await.unwrap();

    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    let numbers: Vec<i32> = parts.iter().map(|p| p.part_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_round_trip_reassembles_input_exactly() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = sink_with_min(&store, 32);

    // Uneven chunk sizes that straddle part boundaries.
    let chunks: Vec<Vec<u8>> = (0u8..40)
        .map(|i| vec![i; (i as usize % 13) + 1])
        .collect();
    let mut expected = Vec::new();
    for chunk in &chunks {
        expected.extend_from_slice(chunk);
        sink.push(chunk).await.unwrap();
    }
    sink.finish().await.unwrap();

    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap(),
        Bytes::from(expected)
    );
}

#[tokio::test]
async fn test_initiate_called_once_across_many_parts() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = sink_with_min(&store, 4);

    for _ in 0..10 {
        sink.push(b"0123").await.unwrap();
    }
    sink.finish().await.unwrap();

    assert_eq!(store.initiate_calls().await, 1);
    assert_eq!(store.complete_calls().await, 1);
}

#[tokio::test]
async fn test_empty_stream_initiates_and_finalizes_empty() {
    let store = Arc::new(InMemoryObjectStore::new());
    let sink = sink_with_min(&store, 32);

    let outcome = sink.consume(chunk_stream(vec![])).await.unwrap();

    assert_eq!(store.initiate_calls().await, 1);
    assert_eq!(store.complete_calls().await, 1);
    assert_eq!(outcome.key, "path/to/object");
    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    assert!(parts.is_empty());
    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_three_plus_three_mib_single_part() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = StreamingUploadSink::new(
        Arc::clone(&store) as Arc<dyn ObjectStoreClient>,
        target(),
        UploadRequestConfig::default(),
    );

    sink.push(&vec![1u8; 3 * MIB]).await.unwrap();
    sink.push(&vec![2u8; 3 * MIB]).await.unwrap();
    sink.finish().await.unwrap();

    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].part_number, 1);
    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap().len(),
        6 * MIB
    );
}

#[tokio::test]
async fn test_oversized_chunk_uploaded_unsplit() {
    let store = Arc::new(InMemoryObjectStore::new());
    let mut sink = StreamingUploadSink::new(
        Arc::clone(&store) as Arc<dyn ObjectStoreClient>,
        target(),
        UploadRequestConfig::default(),
    );

    sink.push(&vec![9u8; 7 * MIB]).await.unwrap();
    sink.finish().await.unwrap();

    let parts = store
        .completed_parts("test-bucket", "path/to/object")
        .await
        .unwrap();
    assert_eq!(parts.len(), 1, "a 7 MiB chunk is one part, not split");
    assert_eq!(
        store.object("test-bucket", "path/to/object").await.unwrap().len(),
        7 * MIB
    );
}

#[tokio::test]
async fn test_part_failure_skips_finalize() {
    let store = Arc::new(InMemoryObjectStore::new());
    let flaky = Arc::new(FailingPartClient {
        inner: Arc::clone(&store),
        fail_on_part: 2,
    });
    let sink = StreamingUploadSink::with_min_part_size(
        flaky as Arc<dyn ObjectStoreClient>,
        target(),
        UploadRequestConfig::default(),
        4,
    );

    let err = sink
        .consume(chunk_stream(vec![b"aaaa", b"bbbb", b"cccc"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::UploadPart);
    assert_eq!(store.complete_calls().await, 0, "no finalize after failure");
    assert!(store.object("test-bucket", "path/to/object").await.is_none());
    assert_eq!(store.open_uploads().await, 1, "remote upload is left open");
}

#[tokio::test]
async fn test_input_stream_error_surfaces_without_finalize() {
    let store = Arc::new(InMemoryObjectStore::new());
    let sink = sink_with_min(&store, 4);

    let stream: ByteStream = Box::pin(futures::stream::iter(vec![
        Ok(Bytes::from_static(b"good")),
        Err(std::io::Error::other("disk gone")),
    ]));
    let err = sink.consume(stream).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Storage);
    assert_eq!(store.complete_calls().await, 0);
}

/// Delegates to the in-memory store but fails one chosen part upload.
#[derive(Debug)]
struct FailingPartClient {
    inner: Arc<InMemoryObjectStore>,
    fail_on_part: i32,
}

#[async_trait]
impl ObjectStoreClient for FailingPartClient {
    async fn initiate_upload(
        &self,
        target: &UploadTarget,
        request: &UploadRequestConfig,
    ) -> AppResult<String> {
        self.inner.initiate_upload(target, request).await
    }

    async fn upload_part(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        part_number: i32,
        body: Bytes,
        request: &UploadRequestConfig,
    ) -> AppResult<String> {
        if part_number == self.fail_on_part {
            return Err(partflow_core::AppError::external_service(format!(
                "Injected failure for part {part_number}"
            )));
        }
        self.inner
            .upload_part(target, upload_id, part_number, body, request)
            .await
    }

    async fn complete_upload(
        &self,
        target: &UploadTarget,
        upload_id: &str,
        parts: &[CompletedPart],
    ) -> AppResult<FinalizeOutcome> {
        self.inner.complete_upload(target, upload_id, parts).await
    }
}
