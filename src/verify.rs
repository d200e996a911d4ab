//! Structural integrity checks.

use std::collections::{HashMap, HashSet};

use crate::edges::LinkKind;
use crate::node::{NodeId, Side};
use crate::trie::{Descent, PatriciaTrie};

impl<V> PatriciaTrie<V> {
    /// Verify trie integrity - returns list of issues found.
    ///
    /// Checks that down-links strictly increase the bit index, that every
    /// node is the target of exactly one back-link, that a non-empty trie has
    /// exactly one empty child slot, and that every stored key re-descends
    /// from the root to its own node through the back-link targeting it.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let Some(root) = self.root_id() else {
            if self.len() != 0 {
                issues.push(format!("empty root but len() = {}", self.len()));
            }
            return issues;
        };

        let width = self.width();
        let mut reached: HashSet<NodeId> = HashSet::from([root]);
        let mut back_links: HashMap<NodeId, Vec<(NodeId, Side)>> = HashMap::new();
        let mut empty_slots = 0usize;

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.bit > width.bits() {
                issues.push(format!(
                    "node {:#x} tests bit {} beyond width {}",
                    node.key,
                    node.bit,
                    width.bits()
                ));
            }
            if node.key > width.max_key() {
                issues.push(format!("node key {:#x} exceeds width", node.key));
            }
            for side in [Side::Left, Side::Right] {
                let Some(child) = node.child(side) else {
                    empty_slots += 1;
                    continue;
                };
                match link_kind(self.node(child).bit, node.bit) {
                    LinkKind::Down => {
                        if !reached.insert(child) {
                            issues.push(format!(
                                "node {:#x} reached by more than one down-link",
                                self.node(child).key
                            ));
                            continue;
                        }
                        stack.push(child);
                    }
                    LinkKind::Back => back_links.entry(child).or_default().push((id, side)),
                }
            }
        }

        if reached.len() != self.len() {
            issues.push(format!(
                "{} nodes reachable but len() = {}",
                reached.len(),
                self.len()
            ));
        }
        if empty_slots != 1 {
            issues.push(format!("expected one empty child slot, found {empty_slots}"));
        }

        for &id in &reached {
            let key = self.node(id).key;
            let sources = back_links.get(&id).map(Vec::as_slice).unwrap_or(&[]);
            if sources.len() != 1 {
                issues.push(format!(
                    "node {key:#x} is the target of {} back-links",
                    sources.len()
                ));
                continue;
            }
            let (source, side) = sources[0];
            let Descent { node, parent } = self.descend(root, key);
            if node != id || parent != Some(source) {
                issues.push(format!(
                    "key {key:#x} does not re-descend through its back-link"
                ));
            } else if width.side(key, self.node(source).bit) != side {
                issues.push(format!(
                    "key {key:#x} ends on the wrong side of node {:#x}",
                    self.node(source).key
                ));
            }
        }

        issues
    }
}

fn link_kind(child_bit: u16, parent_bit: u16) -> LinkKind {
    if child_bit > parent_bit {
        LinkKind::Down
    } else {
        LinkKind::Back
    }
}

#[cfg(test)]
mod tests {
    use crate::PatriciaTrie;

    #[test]
    fn test_sound_tries_have_no_issues() {
        let mut t = PatriciaTrie::with_key_bits(5).unwrap();
        assert!(t.verify_integrity().is_empty());
        for key in [1, 19, 5, 18, 3, 8, 9, 14, 0, 31] {
            t.insert(key, ()).unwrap();
            assert_eq!(t.verify_integrity(), Vec::<String>::new());
        }
        for key in [19, 1, 0, 14, 31] {
            t.remove(key).unwrap();
            assert_eq!(t.verify_integrity(), Vec::<String>::new());
        }
    }
}
