//! A trie behind a single reader-writer lock.

use parking_lot::RwLock;

use crate::config::Config;
use crate::edges::Edge;
use crate::error::Result;
use crate::trie::PatriciaTrie;

/// A [`PatriciaTrie`] shareable across threads.
///
/// Inserts and removals take the write lock; lookups and traversals take the
/// read lock. The whole trie is one resource: there is no finer-grained
/// locking.
pub struct SharedTrie<V> {
    inner: RwLock<PatriciaTrie<V>>,
}

impl<V> SharedTrie<V> {
    /// Create an empty shared trie with the default key width.
    pub fn new() -> Self {
        Self::from_trie(PatriciaTrie::new())
    }

    /// Create an empty shared trie from a configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self::from_trie(PatriciaTrie::with_config(config)?))
    }

    /// Wrap an existing trie.
    pub fn from_trie(trie: PatriciaTrie<V>) -> Self {
        Self {
            inner: RwLock::new(trie),
        }
    }

    /// Insert unless present. Returns `true` when a node was created.
    pub fn insert(&self, key: u64, value: V) -> Result<bool> {
        self.inner.write().insert(key, value)
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&self, key: u64) -> Result<Option<V>> {
        self.inner.write().remove(key)
    }

    pub fn contains_key(&self, key: u64) -> Result<bool> {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Snapshot of every link, taken under one read lock.
    pub fn edges(&self) -> Vec<Edge> {
        self.inner.read().edges().collect()
    }

    /// Run `f` against the trie while holding the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&PatriciaTrie<V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` against the trie while holding the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut PatriciaTrie<V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Unwrap the trie.
    pub fn into_inner(self) -> PatriciaTrie<V> {
        self.inner.into_inner()
    }
}

impl<V: Clone> SharedTrie<V> {
    /// Clone of the value stored under `key`.
    pub fn get(&self, key: u64) -> Result<Option<V>> {
        Ok(self.inner.read().get(key)?.cloned())
    }
}

impl<V> Default for SharedTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}
