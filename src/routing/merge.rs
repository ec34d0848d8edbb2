//! Trie merge (concat).
//!
//! # Responsibilities
//! - Merge a freshly compiled chain into an existing sibling chain
//! - Factor common literal prefixes into one shared static node
//!
//! # Design Decisions
//! - Only the last node of the left chain and the first node of the right
//!   chain are ever compared; nothing further back is touched
//! - Iterative over an explicit stack of chain pairs
//! - Layers and fragments never merge

use tracing::trace;

use crate::routing::node::{common_prefix_len, Node, Static};

/// Result of comparing the two adjacent nodes.
enum Outcome<H> {
    /// Incompatible; the right node becomes a new sibling.
    Append(Node<H>),
    /// The right node was folded entirely into the left one.
    Absorbed,
    /// The nodes are now equal; merge their child chains next.
    Descend(Vec<Node<H>>),
}

/// Merge `right` into `left` in place.
pub fn concat<H>(left: &mut Vec<Node<H>>, right: Vec<Node<H>>) {
    let mut stack = vec![(left, right)];

    while let Some((left, right)) = stack.pop() {
        let mut rest = right.into_iter();
        let Some(first) = rest.next() else {
            continue;
        };

        let outcome = match left.last_mut() {
            Some(last) => merge_adjacent(last, first),
            None => Outcome::Append(first),
        };

        match outcome {
            Outcome::Append(node) => {
                left.push(node);
                left.extend(rest);
            }
            Outcome::Absorbed => left.extend(rest),
            Outcome::Descend(children) => {
                let at = left.len() - 1;
                left.extend(rest);
                if let Some(target) = left[at].children_mut() {
                    stack.push((target, children));
                }
            }
        }
    }
}

fn merge_adjacent<H>(left: &mut Node<H>, right: Node<H>) -> Outcome<H> {
    match (left, right) {
        (Node::Wildcard(left), Node::Wildcard(right)) if left.name == right.name => {
            trace!(capture = %left.name, "merge wildcard");
            left.children.extend(right.children);
            Outcome::Absorbed
        }
        (Node::Parameter(left), Node::Parameter(right)) if left.name == right.name => {
            trace!(capture = %left.name, "merge parameter");
            Outcome::Descend(right.children)
        }
        (Node::Static(left), Node::Static(right)) => merge_static(left, right),
        (_, right) => Outcome::Append(right),
    }
}

fn merge_static<H>(left: &mut Static<H>, mut right: Static<H>) -> Outcome<H> {
    if left.text == right.text {
        trace!(text = %left.text, "merge static");
        return Outcome::Descend(right.children);
    }

    let prefix_end = common_prefix_len(&left.text, &right.text);
    if prefix_end == 0 {
        return Outcome::Append(Node::Static(right));
    }

    if prefix_end < left.text.len() {
        trace!(text = %left.text, at = prefix_end, "split left");
        left.split_at(prefix_end);
    }
    if prefix_end < right.text.len() {
        trace!(text = %right.text, at = prefix_end, "split right");
        right.split_at(prefix_end);
    }

    Outcome::Descend(right.children)
}
