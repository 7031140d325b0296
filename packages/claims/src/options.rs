//! Parser limits configuration.

use crate::limits::{DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_PAYLOAD_LEN};
use serde::{Deserialize, Serialize};

/// Limits applied to untrusted payload text before any claim is examined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum payload length in bytes.
    pub max_payload_len: usize,
    /// Maximum object/array nesting depth, counting the top-level object.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Tight limits for payloads expected to carry only a handful of flat claims.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_payload_len: 8 * 1024,
            max_nesting_depth: 4,
        }
    }

    /// Set the maximum payload length.
    #[must_use]
    pub fn with_max_payload_len(mut self, max: usize) -> Self {
        self.max_payload_len = max;
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, max: usize) -> Self {
        self.max_nesting_depth = max;
        self
    }
}
