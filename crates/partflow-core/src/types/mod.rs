//! Domain types shared across PartFlow crates.

pub mod part;
pub mod request;
pub mod target;

pub use part::{CompletedPart, FinalizeOutcome, MIN_PART_SIZE};
pub use request::UploadRequestConfig;
pub use target::UploadTarget;
