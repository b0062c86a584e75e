//! Completion metadata for uploaded parts and finished uploads.

use serde::{Deserialize, Serialize};

/// Minimum part size mandated by the multipart protocol (5 MiB).
///
/// Every uploaded part except the last must be at least this large.
pub const MIN_PART_SIZE: usize = 5_242_880;

/// One finished upload-part operation.
///
/// Immutable once created; the entity tag is required at finalize time to
/// confirm which bytes belong to which part slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedPart {
    /// 1-based sequential part number.
    pub part_number: i32,
    /// Opaque identifier returned by the store for this part.
    pub entity_tag: String,
}

impl CompletedPart {
    /// Create a new completed-part record.
    pub fn new(part_number: i32, entity_tag: impl Into<String>) -> Self {
        Self {
            part_number,
            entity_tag: entity_tag.into(),
        }
    }
}

/// The store's response to a successful finalize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeOutcome {
    /// Bucket the object was written to.
    pub bucket: String,
    /// Key of the final object.
    pub key: String,
    /// URI of the final object, if the store reports one.
    pub location: Option<String>,
    /// Entity tag of the assembled object, if the store reports one.
    pub entity_tag: Option<String>,
}
