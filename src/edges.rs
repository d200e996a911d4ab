//! Read-only traversals of the node graph.
//!
//! Both walks go depth first from the root, left before right, and never
//! follow a back-link, so they terminate after visiting each link once.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use crate::node::{NodeId, Side};
use crate::trie::PatriciaTrie;

/// How a child link relates to its source node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Target tests a later bit; part of the tree proper.
    Down,
    /// Target tests the same or an earlier bit; ends a descent.
    Back,
}

/// One link of the node graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Key held by the source node
    pub parent_key: u64,
    /// Bit index the source node tests
    pub parent_bit: u16,
    /// Which of the source's children this is
    pub side: Side,
    /// Key held by the target node
    pub child_key: u64,
    /// Bit index the target node tests
    pub child_bit: u16,
    pub kind: LinkKind,
}

impl Edge {
    #[inline]
    pub fn is_back_link(&self) -> bool {
        self.kind == LinkKind::Back
    }
}

#[derive(Clone, Copy)]
struct Frame {
    node: NodeId,
    next: Option<Side>,
}

/// Shared cursor: yields every non-empty link as `(source, side, target, kind)`.
struct Walk<'a, V> {
    trie: &'a PatriciaTrie<V>,
    // Down-link paths are at most K + 1 nodes deep.
    stack: SmallVec<[Frame; 32]>,
}

impl<'a, V> Walk<'a, V> {
    fn new(trie: &'a PatriciaTrie<V>) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = trie.root_id() {
            stack.push(Frame {
                node: root,
                next: Some(Side::Left),
            });
        }
        Self { trie, stack }
    }

    fn next_link(&mut self) -> Option<(NodeId, Side, NodeId, LinkKind)> {
        let trie = self.trie;
        while let Some(frame) = self.stack.last_mut() {
            let Some(side) = frame.next else {
                self.stack.pop();
                continue;
            };
            frame.next = match side {
                Side::Left => Some(Side::Right),
                Side::Right => None,
            };
            let source = frame.node;

            let Some(target) = trie.node(source).child(side) else {
                continue;
            };
            let kind = if trie.node(target).bit > trie.node(source).bit {
                LinkKind::Down
            } else {
                LinkKind::Back
            };
            if kind == LinkKind::Down {
                self.stack.push(Frame {
                    node: target,
                    next: Some(Side::Left),
                });
            }
            return Some((source, side, target, kind));
        }
        None
    }
}

impl<V> Clone for Walk<'_, V> {
    fn clone(&self) -> Self {
        Self {
            trie: self.trie,
            stack: self.stack.clone(),
        }
    }
}

/// Iterator over the links of a trie. See [`PatriciaTrie::edges`].
pub struct Edges<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Edges<'a, V> {
    pub(crate) fn new(trie: &'a PatriciaTrie<V>) -> Self {
        Self {
            walk: Walk::new(trie),
        }
    }
}

impl<V> Iterator for Edges<'_, V> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let (source, side, target, kind) = self.walk.next_link()?;
        let parent = self.walk.trie.node(source);
        let child = self.walk.trie.node(target);
        Some(Edge {
            parent_key: parent.key,
            parent_bit: parent.bit,
            side,
            child_key: child.key,
            child_bit: child.bit,
            kind,
        })
    }
}

impl<V> FusedIterator for Edges<'_, V> {}

impl<V> Clone for Edges<'_, V> {
    fn clone(&self) -> Self {
        Self {
            walk: self.walk.clone(),
        }
    }
}

/// Entries in ascending key order. See [`PatriciaTrie::iter`].
///
/// Every key is the target of exactly one back-link, and a left-to-right walk
/// meets those back-links in key order.
pub struct Iter<'a, V> {
    walk: Walk<'a, V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(trie: &'a PatriciaTrie<V>) -> Self {
        Self {
            walk: Walk::new(trie),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.walk.trie;
        loop {
            let (_, _, target, kind) = self.walk.next_link()?;
            if kind == LinkKind::Back {
                let node = trie.node(target);
                return Some((node.key, &node.value));
            }
        }
    }
}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            walk: self.walk.clone(),
        }
    }
}

impl<'a, V> IntoIterator for &'a PatriciaTrie<V> {
    type Item = (u64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
