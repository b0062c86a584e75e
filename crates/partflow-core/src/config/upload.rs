//! Upload engine configuration.

use serde::{Deserialize, Serialize};

use crate::types::part::MIN_PART_SIZE;

/// Settings for the multipart upload engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Minimum part size in bytes. Values below the protocol minimum of
    /// 5 MiB are clamped up by [`UploadConfig::min_part_size`].
    #[serde(default = "default_min_part_size")]
    pub min_part_size_bytes: u64,
    /// Default MIME type applied when none is given per upload.
    #[serde(default)]
    pub default_content_type: Option<String>,
}

impl UploadConfig {
    /// Effective minimum part size, floored at the protocol minimum.
    pub fn min_part_size(&self) -> usize {
        (self.min_part_size_bytes as usize).max(MIN_PART_SIZE)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            min_part_size_bytes: default_min_part_size(),
            default_content_type: None,
        }
    }
}

fn default_min_part_size() -> u64 {
    MIN_PART_SIZE as u64 // 5 MiB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_part_size_clamped_to_protocol_floor() {
        let config = UploadConfig {
            min_part_size_bytes: 1024,
            default_content_type: None,
        };
        assert_eq!(config.min_part_size(), MIN_PART_SIZE);
    }

    #[test]
    fn test_min_part_size_above_floor_kept() {
        let config = UploadConfig {
            min_part_size_bytes: 64 * 1024 * 1024,
            default_content_type: None,
        };
        assert_eq!(config.min_part_size(), 64 * 1024 * 1024);
    }
}
