//! Construction-time configuration.

/// Default key width used by [`PatriciaTrie::new`](crate::PatriciaTrie::new).
pub const DEFAULT_KEY_BITS: u32 = 32;

/// Configuration for a [`PatriciaTrie`](crate::PatriciaTrie).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Width `K` of every key, in bits (`1..=64`). Fixed for the trie's lifetime.
    pub key_bits: u32,
    /// Initial capacity hint for the node arena
    pub initial_capacity: usize,
}

impl Config {
    /// Default configuration with a different key width.
    pub fn with_key_bits(key_bits: u32) -> Self {
        Self {
            key_bits,
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            initial_capacity: 0,
        }
    }
}
