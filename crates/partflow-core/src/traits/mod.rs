//! Trait seams implemented by other PartFlow crates.

pub mod object_store;

pub use object_store::{ByteStream, ObjectStoreClient};
