//! Text and DOT renderings of the node graph for debugging.
//!
//! Both are built purely on [`PatriciaTrie::edges`] and never touch the trie's
//! internals. Node labels show the key in binary at the trie's width followed
//! by the bit index the node tests.

use std::collections::HashMap;
use std::fmt::{self, Write};

use crate::edges::LinkKind;
use crate::node::Side;
use crate::trie::PatriciaTrie;

fn label(key: u64, bit: u16, width: usize) -> String {
    format!("{key:0width$b}/{bit}")
}

/// One node per line, indented by depth. Back-link targets are printed as
/// `terminal` lines under the node that holds the link.
pub fn text<V>(trie: &PatriciaTrie<V>) -> String {
    let width = trie.key_bits() as usize;
    let mut out = String::new();
    let mut depth: HashMap<u64, usize> = HashMap::new();

    for edge in trie.edges() {
        let parent_depth = match depth.get(&edge.parent_key) {
            Some(&d) => d,
            None => {
                // Only the root is met as a parent before being met as a child.
                let _ = writeln!(out, "{}", label(edge.parent_key, edge.parent_bit, width));
                depth.insert(edge.parent_key, 0);
                0
            }
        };
        let indent = "  ".repeat(parent_depth + 1);
        let side = match edge.side {
            Side::Left => 'L',
            Side::Right => 'R',
        };
        let child = label(edge.child_key, edge.child_bit, width);
        match edge.kind {
            LinkKind::Down => {
                let _ = writeln!(out, "{indent}{side} {child}");
                depth.insert(edge.child_key, parent_depth + 1);
            }
            LinkKind::Back => {
                let _ = writeln!(out, "{indent}{side} terminal {child}");
            }
        }
    }
    out
}

/// Write the trie as a DOT `digraph`: solid down-links, dotted back-links.
pub fn write_dot<V, W: Write>(trie: &PatriciaTrie<V>, out: &mut W) -> fmt::Result {
    let width = trie.key_bits() as usize;
    writeln!(out, "digraph patricia {{")?;
    for edge in trie.edges() {
        let tailport = match edge.side {
            Side::Left => "sw",
            Side::Right => "se",
        };
        let style = match edge.kind {
            LinkKind::Down => format!("tailport={tailport}"),
            LinkKind::Back => format!("style=dotted, tailport={tailport}, headport=s"),
        };
        writeln!(
            out,
            "  \"{}\" -> \"{}\" [{style}];",
            label(edge.parent_key, edge.parent_bit, width),
            label(edge.child_key, edge.child_bit, width),
        )?;
    }
    writeln!(out, "}}")
}

/// [`write_dot`] into a fresh `String`.
pub fn dot<V>(trie: &PatriciaTrie<V>) -> String {
    let mut out = String::new();
    write_dot(trie, &mut out).expect("writing to a String cannot fail");
    out
}
