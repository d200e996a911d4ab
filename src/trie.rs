//! PATRICIA trie over fixed-width integer keys.
//!
//! Every node holds a real key. A child link whose target tests a bit index
//! no greater than its source's is a back-link: following it ends a descent,
//! and the target's key is then compared against the search key. A non-empty
//! trie also has exactly one empty child slot, the one the all-zero key's
//! search ends on while no node holds that key.

use std::fmt;

use tracing::{debug, trace};

use crate::bits::KeyWidth;
use crate::config::Config;
use crate::edges::{Edges, Iter};
use crate::error::Result;
use crate::node::{Node, NodeArena, NodeId, Side};

/// Where a descent stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Descent {
    /// Candidate terminal node; its key still has to be compared.
    pub(crate) node: NodeId,
    /// Node the descent last stepped from. `None` only when it stopped at the
    /// start node on an empty child slot.
    pub(crate) parent: Option<NodeId>,
}

/// Incoming reference to a node: the root pointer or a parent's child slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Root,
    Child(NodeId, Side),
}

/// A PATRICIA trie mapping `K`-bit keys to values.
///
/// Node count always equals key count. Lookup and insert touch at most
/// `K + 1` nodes; remove runs a bounded number of such descents.
///
/// ```rust
/// use patricia_trie::PatriciaTrie;
///
/// let mut trie = PatriciaTrie::with_key_bits(5).unwrap();
/// trie.insert(19, 'S').unwrap();
/// trie.insert(5, 'E').unwrap();
///
/// assert_eq!(trie.get(19).unwrap(), Some(&'S'));
/// assert_eq!(trie.remove(5).unwrap(), Some('E'));
/// assert_eq!(trie.get(5).unwrap(), None);
/// assert!(trie.get(32).is_err());
/// ```
#[derive(Clone)]
pub struct PatriciaTrie<V> {
    width: KeyWidth,
    nodes: NodeArena<V>,
    root: Option<NodeId>,
}

impl<V> PatriciaTrie<V> {
    /// Create an empty trie with the default key width.
    pub fn new() -> Self {
        Self::from_width(KeyWidth::default(), 0)
    }

    /// Create an empty trie over `key_bits`-bit keys.
    pub fn with_key_bits(key_bits: u32) -> Result<Self> {
        Self::with_config(Config::with_key_bits(key_bits))
    }

    /// Create an empty trie from a configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        let width = KeyWidth::new(config.key_bits)?;
        Ok(Self::from_width(width, config.initial_capacity))
    }

    fn from_width(width: KeyWidth, capacity: usize) -> Self {
        Self {
            width,
            nodes: NodeArena::with_capacity(capacity),
            root: None,
        }
    }

    /// Key width `K` in bits.
    #[inline]
    pub fn key_bits(&self) -> u32 {
        u32::from(self.width.bits())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: u64) -> Result<Option<&V>> {
        let key = self.width.check(key)?;
        Ok(self.find(key).map(|id| &self.nodes.get(id).value))
    }

    pub fn get_mut(&mut self, key: u64) -> Result<Option<&mut V>> {
        let key = self.width.check(key)?;
        Ok(self.find(key).map(|id| &mut self.nodes.get_mut(id).value))
    }

    pub fn contains_key(&self, key: u64) -> Result<bool> {
        let key = self.width.check(key)?;
        Ok(self.find(key).is_some())
    }

    /// Insert `key` unless it is already present.
    ///
    /// Returns `true` when a node was created. An existing entry is never
    /// overwritten; use [`get_mut`](Self::get_mut) to update a value in place.
    pub fn insert(&mut self, key: u64, value: V) -> Result<bool> {
        let key = self.width.check(key)?;

        let Some(root) = self.root else {
            // The first key is told apart from the implicit all-zero key.
            let bit = self.width.first_differing_bit(key, 0);
            let id = self.alloc_self_linked(key, value, bit);
            self.root = Some(id);
            trace!(key, bit, "created root");
            return Ok(true);
        };

        let closest = self.nodes.get(self.descend(root, key).node).key;
        if closest == key {
            return Ok(false);
        }
        let diff = self.width.first_differing_bit(key, closest);
        debug_assert!(diff < self.width.bits());
        self.splice(root, key, value, diff);
        Ok(true)
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: u64) -> Result<Option<V>> {
        let key = self.width.check(key)?;
        let Some(root) = self.root else {
            return Ok(None);
        };

        let Descent { node: holder, parent } = self.descend(root, key);
        if self.nodes.get(holder).key != key {
            return Ok(None);
        }
        let Some(terminal) = parent else {
            unreachable!("stored key {key:#x} reached without a back-link");
        };

        let value = if terminal == holder {
            self.excise_self_linked(holder, key)
        } else {
            self.excise_terminal(root, holder, terminal, key)
        };
        Ok(Some(value))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Every link reachable from the root, depth first, left before right.
    ///
    /// Back-links are reported but never followed, so the walk is finite.
    pub fn edges(&self) -> Edges<'_, V> {
        Edges::new(self)
    }

    #[inline]
    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn width(&self) -> KeyWidth {
        self.width
    }

    fn find(&self, key: u64) -> Option<NodeId> {
        let root = self.root?;
        let found = self.descend(root, key).node;
        (self.nodes.get(found).key == key).then_some(found)
    }

    /// Walk from `start` (entered with a virtual parent bit of -1) until a
    /// back-link or an empty child slot is reached.
    pub(crate) fn descend(&self, start: NodeId, key: u64) -> Descent {
        let mut node = start;
        let mut parent = None;
        let mut parent_bit: Option<u16> = None;
        loop {
            let current = self.nodes.get(node);
            if parent_bit.is_some_and(|bit| current.bit <= bit) {
                break;
            }
            match current.child(self.width.side(key, current.bit)) {
                Some(next) => {
                    parent = Some(node);
                    parent_bit = Some(current.bit);
                    node = next;
                }
                None => break,
            }
        }
        Descent { node, parent }
    }

    /// New node testing `bit` whose own side links back to itself.
    fn alloc_self_linked(&mut self, key: u64, value: V, bit: u16) -> NodeId {
        let id = self.nodes.alloc(Node::new(key, value, bit));
        let own = self.width.side(key, bit);
        self.nodes.get_mut(id).set_child(own, Some(id));
        id
    }

    /// Splice a node testing `diff` onto the first edge of `key`'s path that
    /// either reaches a node testing a later bit or is a back-link.
    fn splice(&mut self, root: NodeId, key: u64, value: V, diff: u16) {
        let mut link = Link::Root;
        let mut node = root;
        let mut parent_bit: Option<u16> = None;
        loop {
            let current = self.nodes.get(node);
            if current.bit > diff || parent_bit.is_some_and(|bit| current.bit <= bit) {
                break;
            }
            let side = self.width.side(key, current.bit);
            match current.child(side) {
                Some(next) => {
                    link = Link::Child(node, side);
                    parent_bit = Some(current.bit);
                    node = next;
                }
                None => {
                    self.fill_empty_slot(node, side, key, value);
                    return;
                }
            }
        }

        let id = self.alloc_self_linked(key, value, diff);
        let displaced = self.width.side(key, diff).opposite();
        self.nodes.get_mut(id).set_child(displaced, Some(node));
        self.set_link(link, Some(id));
        trace!(key, bit = diff, displaced = self.nodes.get(node).key, "spliced node");
    }

    /// Hang a new node on the empty slot. Its bit is where `key` leaves the
    /// all-zero key, which is always below `parent`'s.
    fn fill_empty_slot(&mut self, parent: NodeId, side: Side, key: u64, value: V) {
        let bit = self.width.first_differing_bit(key, 0);
        debug_assert!(bit > self.nodes.get(parent).bit);
        let id = self.alloc_self_linked(key, value, bit);
        self.nodes.get_mut(parent).set_child(side, Some(id));
        trace!(key, bit, "filled empty slot");
    }

    fn set_link(&mut self, link: Link, target: Option<NodeId>) {
        match link {
            Link::Root => self.root = target,
            Link::Child(id, side) => self.nodes.get_mut(id).set_child(side, target),
        }
    }

    /// Down-link into `target`, found by walking `key`'s path from the root.
    /// `target` must lie on that path.
    fn incoming_link(&self, target: NodeId, key: u64) -> Link {
        let mut node = match self.root {
            Some(root) if root != target => root,
            _ => return Link::Root,
        };
        loop {
            let current = self.nodes.get(node);
            let side = self.width.side(key, current.bit);
            match current.child(side) {
                Some(next) if next == target => return Link::Child(node, side),
                Some(next) if self.nodes.get(next).bit > current.bit => node = next,
                _ => unreachable!("{target:?} is not on the search path of {key:#x}"),
            }
        }
    }

    /// `node` holds `key` and its own back-link ends `key`'s search. Its other
    /// child takes its place.
    fn excise_self_linked(&mut self, node: NodeId, key: u64) -> V {
        let current = self.nodes.get(node);
        let own = self.width.side(key, current.bit);
        debug_assert_eq!(current.child(own), Some(node));
        let survivor = current.child(own.opposite());

        let link = self.incoming_link(node, key);
        self.set_link(link, survivor);
        debug!(
            key,
            promoted = ?survivor.map(|id| self.nodes.get(id).key),
            "removed self-linked node"
        );
        self.nodes.free(node).value
    }

    /// `holder` holds `key`, but the back-link ending `key`'s search belongs
    /// to `terminal`, deeper in `holder`'s subtree. `terminal`'s entry moves
    /// up into `holder`, the back-link that ended `terminal`'s own search is
    /// retargeted to `holder`, and `terminal` is cut out.
    fn excise_terminal(
        &mut self,
        root: NodeId,
        holder: NodeId,
        terminal: NodeId,
        key: u64,
    ) -> V {
        let moved_key = self.nodes.get(terminal).key;
        let Descent { node: found, parent } = self.descend(root, moved_key);
        debug_assert_eq!(found, terminal);
        let Some(source) = parent else {
            unreachable!("stored key {moved_key:#x} reached without a back-link");
        };
        let source_side = self.width.side(moved_key, self.nodes.get(source).bit);
        debug_assert_eq!(self.nodes.get(source).child(source_side), Some(terminal));

        let key_side = self.width.side(key, self.nodes.get(terminal).bit);
        debug_assert_eq!(self.nodes.get(terminal).child(key_side), Some(holder));

        self.nodes.swap_entries(holder, terminal);
        self.nodes
            .get_mut(source)
            .set_child(source_side, Some(holder));

        // Read after the retarget: when `source` is `terminal` this is the
        // link that now points at `holder`.
        let survivor = self.nodes.get(terminal).child(key_side.opposite());
        let link = self.incoming_link(terminal, key);
        self.set_link(link, survivor);
        debug!(key, moved_key, "removed node by relocating its terminal");
        self.nodes.free(terminal).value
    }
}

impl<V> Default for PatriciaTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for PatriciaTrie<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
