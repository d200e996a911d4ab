//! Error types for the trie's key boundary.

use thiserror::Error;

/// Result type alias using `TrieError`
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors raised before a key reaches any trie operation.
///
/// Missing keys are not errors: lookups return `Ok(None)` and removals of
/// absent keys are no-ops.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieError {
    /// Key has bits set above the configured width
    #[error("key {key:#x} does not fit in {bits} bits")]
    KeyOutOfRange {
        /// Rejected key
        key: u64,
        /// Configured width
        bits: u16,
    },

    /// Key width outside `1..=64`
    #[error("key width must be between 1 and 64 bits, got {0}")]
    InvalidKeyBits(u32),
}
