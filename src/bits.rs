//! Bit addressing over fixed-width keys.
//!
//! Bit index `0` is the most significant bit of the `K`-bit field and
//! `K - 1` the least significant. Index `K` itself is a sentinel that always
//! reads as set, so a descent that has consumed every real bit keeps choosing
//! the right-hand side.

use tracing::debug;

use crate::config::DEFAULT_KEY_BITS;
use crate::error::{Result, TrieError};
use crate::node::Side;

/// Largest supported key width; keys are carried as `u64`.
pub const MAX_KEY_BITS: u32 = 64;

/// Width of every key stored in one trie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyWidth {
    bits: u16,
}

impl KeyWidth {
    /// Create a width of `bits` bits, rejecting anything outside `1..=64`.
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_KEY_BITS {
            return Err(TrieError::InvalidKeyBits(bits));
        }
        Ok(Self { bits: bits as u16 })
    }

    /// Number of bits in a key; also the sentinel bit index.
    #[inline]
    pub fn bits(self) -> u16 {
        self.bits
    }

    /// Largest key representable at this width.
    #[inline]
    pub fn max_key(self) -> u64 {
        u64::MAX >> (64 - u32::from(self.bits))
    }

    /// Reject keys with bits set above the width.
    pub fn check(self, key: u64) -> Result<u64> {
        if key > self.max_key() {
            debug!(key, bits = self.bits, "rejecting out-of-range key");
            return Err(TrieError::KeyOutOfRange {
                key,
                bits: self.bits,
            });
        }
        Ok(key)
    }

    /// Bit of `key` at index `bit`, counted from the most significant bit.
    #[inline]
    pub fn bit(self, key: u64, bit: u16) -> bool {
        debug_assert!(bit <= self.bits);
        if bit >= self.bits {
            return true;
        }
        (key >> (self.bits - 1 - bit)) & 1 == 1
    }

    /// Child side a descent for `key` takes at a node testing `bit`.
    #[inline]
    pub fn side(self, key: u64, bit: u16) -> Side {
        Side::from_bit(self.bit(key, bit))
    }

    /// First index where `a` and `b` disagree, or `K` when they agree on
    /// every real bit.
    #[inline]
    pub fn first_differing_bit(self, a: u64, b: u64) -> u16 {
        let diff = (a ^ b) & self.max_key();
        if diff == 0 {
            return self.bits;
        }
        (diff.leading_zeros() - (64 - u32::from(self.bits))) as u16
    }
}

impl Default for KeyWidth {
    fn default() -> Self {
        Self {
            bits: DEFAULT_KEY_BITS as u16,
        }
    }
}
