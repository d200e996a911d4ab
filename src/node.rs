//! Nodes and the index arena that owns them.
//!
//! Child references are plain [`NodeId`]s, so a back-link is just an index
//! naming an ancestor (or the node itself). Whether a link is a down-link or a
//! back-link is never stored: it is decided by comparing the two nodes'
//! bit indices.

use std::fmt;

/// Stable index of a node slot in a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child a descent takes: `Left` for a 0 bit, `Right` for a 1 bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Bit value 0
    Left,
    /// Bit value 1
    Right,
}

impl Side {
    /// Side selected by a bit value.
    #[inline]
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// The other side.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// A stored entry plus the bit index it branches on.
///
/// Every node carries a real key; there are no empty structural nodes.
#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    pub(crate) key: u64,
    pub(crate) value: V,
    /// Bit tested during descent, in `0..=K`.
    pub(crate) bit: u16,
    children: [Option<NodeId>; 2],
}

impl<V> Node<V> {
    pub(crate) fn new(key: u64, value: V, bit: u16) -> Self {
        Self {
            key,
            value,
            bit,
            children: [None, None],
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        self.children[side.slot()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        self.children[side.slot()] = child;
    }
}

/// Slot arena for nodes, reusing freed slots before growing.
#[derive(Clone)]
pub(crate) struct NodeArena<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<u32>,
    live: usize,
}

impl<V> NodeArena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        self.live += 1;
        if let Some(idx) = self.free.pop() {
            debug_assert!(self.slots[idx as usize].is_none());
            self.slots[idx as usize] = Some(node);
            return NodeId(idx);
        }
        let idx =
            u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("node arena exhausted"));
        self.slots.push(Some(node));
        NodeId(idx)
    }

    /// Detach a node and hand back its contents.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<V> {
        let node = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("double free of node {id:?}"));
        self.free.push(id.0);
        self.live -= 1;
        node
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<V> {
        match &self.slots[id.index()] {
            Some(node) => node,
            None => panic!("dangling node id {id:?}"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match &mut self.slots[id.index()] {
            Some(node) => node,
            None => panic!("dangling node id {id:?}"),
        }
    }

    /// Exchange the key/value entries of two distinct nodes, leaving their
    /// bit indices and links in place.
    pub(crate) fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a.index() < b.index() {
            (a.index(), b.index())
        } else {
            (b.index(), a.index())
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (&mut head[lo], &mut tail[0]) {
            (Some(x), Some(y)) => {
                std::mem::swap(&mut x.key, &mut y.key);
                std::mem::swap(&mut x.value, &mut y.value);
            }
            _ => panic!("dangling node id in entry swap"),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
