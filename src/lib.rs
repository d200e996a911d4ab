//! # patricia-trie
//!
//! A PATRICIA trie over fixed-width integer keys.
//!
//! Every node stores a real key. Instead of chains of empty branching nodes,
//! some child links point back up to an ancestor (or to the node itself); a
//! descent stops as soon as it follows such a back-link, and the key held by
//! the node it lands on is compared with the search key. Nodes live in an
//! index arena, so back-links are plain indices and deletion's link repair is
//! an index rewrite.
//!
//! The key width `K` (1 to 64 bits) is fixed when the trie is built; keys
//! with bits set above it are rejected before reaching the trie.
//!
//! ## Example
//!
//! ```rust
//! use patricia_trie::{LinkKind, PatriciaTrie};
//!
//! let mut trie = PatriciaTrie::with_key_bits(5).unwrap();
//! for (key, letter) in [(1, 'A'), (19, 'S'), (5, 'E')] {
//!     trie.insert(key, letter).unwrap();
//! }
//!
//! assert_eq!(trie.get(19).unwrap(), Some(&'S'));
//! assert_eq!(trie.get(31).unwrap(), None);
//!
//! // Three nodes: two down-links and one back-link per key.
//! let back = trie.edges().filter(|e| e.kind == LinkKind::Back).count();
//! assert_eq!(back, 3);
//!
//! trie.remove(19).unwrap();
//! assert_eq!(trie.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![1, 5]);
//! ```

#![forbid(unsafe_code)]

pub mod bits;
pub mod config;
pub mod edges;
pub mod error;
mod node;
pub mod render;
pub mod shared;
mod trie;
mod verify;

pub use bits::KeyWidth;
pub use config::Config;
pub use edges::{Edge, Edges, Iter, LinkKind};
pub use error::{Result, TrieError};
pub use node::Side;
pub use shared::SharedTrie;
pub use trie::PatriciaTrie;

#[cfg(test)]
mod proptests;
