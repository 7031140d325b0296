//! Size and range limits for untrusted claim set input

/// Default maximum payload length accepted by the parser (64KB)
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 64 * 1024;

/// Default maximum object/array nesting depth; the top-level object counts as one level
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Earliest accepted time claim: the Unix epoch
pub const MIN_TIMESTAMP: i64 = 0;

/// Latest accepted time claim: 9999-12-31T23:59:59Z
pub const MAX_TIMESTAMP: i64 = 253_402_300_799;
