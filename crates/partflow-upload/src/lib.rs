//! # partflow-upload
//!
//! The streaming multipart-upload engine for PartFlow. Converts an
//! arbitrarily chunked byte stream into protocol-legal parts, uploads
//! them strictly in order, and finalizes the upload.
//!
//! Pipeline: incoming chunks → [`buffer::PartBuffer`] → (threshold met)
//! [`uploader::PartUploader`] → [`session::UploadSession`] records the
//! completion → at end of stream the session finalizes and
//! [`sink::StreamingUploadSink`] surfaces the result.
//!
//! Parts are uploaded one at a time; the next chunk is not consumed
//! while a part upload is in flight. On the first error the upload is
//! abandoned without finalizing — the already-opened remote upload is
//! left to the store's own expiry policy (no remote abort is issued).

pub mod buffer;
pub mod client;
pub mod session;
pub mod sink;
pub mod uploader;

pub use buffer::PartBuffer;
pub use session::UploadSession;
pub use sink::StreamingUploadSink;
pub use uploader::PartUploader;
