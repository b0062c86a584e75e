//! Per-session object metadata applied to every store call.

use serde::{Deserialize, Serialize};

/// Object metadata supplied once at session creation and reused unchanged
/// for the initiate call, every part upload, and the finalize call.
///
/// All fields are optional; `None` means the store's default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequestConfig {
    /// MIME content type of the final object.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Canned ACL to apply (e.g. `"private"`, `"public-read"`).
    #[serde(default)]
    pub acl: Option<String>,
    /// Server-side encryption algorithm (e.g. `"AES256"`, `"aws:kms"`).
    #[serde(default)]
    pub server_side_encryption: Option<String>,
    /// KMS key ID, when `server_side_encryption` is `"aws:kms"`.
    #[serde(default)]
    pub sse_kms_key_id: Option<String>,
    /// Who pays for the request (e.g. `"requester"`).
    #[serde(default)]
    pub request_payer: Option<String>,
}
