//! Trie node variants.
//!
//! # Responsibilities
//! - Define the closed set of node kinds the trie is built from
//! - Hold the per-variant payload (literal text, capture name, layer data)
//! - Provide read-only accessors for inspecting trie shape
//!
//! # Design Decisions
//! - Case-insensitive static matching lowercases one character at a time
//!   and reports how many raw path bytes were consumed, since lowercasing
//!   can change a character's byte length
//! - Children are plain `Vec`s in registration order; nothing reorders them

use std::fmt;

use axum::http::Method;

use crate::routing::router::Fragment;

/// Method predicate attached to a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Methods {
    /// Matches every request method.
    All,
    /// Matches the listed methods. An empty list marks middleware.
    Only(Vec<Method>),
}

impl Methods {
    /// Predicate for middleware registration.
    pub fn middleware() -> Self {
        Methods::Only(Vec::new())
    }

    /// Build an explicit method list, dropping duplicates but keeping order.
    pub fn only<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let mut list: Vec<Method> = Vec::new();
        for method in methods {
            if !list.contains(&method) {
                list.push(method);
            }
        }
        Methods::Only(list)
    }

    /// Returns true for the empty predicate.
    pub fn is_middleware(&self) -> bool {
        matches!(self, Methods::Only(list) if list.is_empty())
    }

    /// Returns true if a handler with this predicate serves `method`.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Methods::All => true,
            Methods::Only(list) => list.contains(method),
        }
    }
}

impl fmt::Display for Methods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Methods::All => write!(f, "ALL"),
            Methods::Only(list) if list.is_empty() => write!(f, "USE"),
            Methods::Only(list) => {
                for (i, method) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", method)?;
                }
                Ok(())
            }
        }
    }
}

/// A registered middleware or handler.
#[derive(Debug)]
pub struct Layer<H> {
    pub(crate) methods: Methods,
    pub(crate) handler: H,
    pub(crate) is_middleware: bool,
    pub(crate) ends_with_slash: bool,
}

impl<H> Layer<H> {
    pub fn methods(&self) -> &Methods {
        &self.methods
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn is_middleware(&self) -> bool {
        self.is_middleware
    }

    /// Whether the registration path carried a trailing `/`.
    pub fn ends_with_slash(&self) -> bool {
        self.ends_with_slash
    }
}

/// A literal path segment.
#[derive(Debug)]
pub struct Static<H> {
    pub(crate) text: String,
    pub(crate) children: Vec<Node<H>>,
}

impl<H> Static<H> {
    pub(crate) fn new(text: impl Into<String>, children: Vec<Node<H>>) -> Self {
        Self {
            text: text.into(),
            children,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }

    /// Match the node against the request path starting at `index`.
    ///
    /// Returns the number of path bytes consumed.
    pub(crate) fn match_at(&self, path: &str, index: usize, case_sensitive: bool) -> Option<usize> {
        let rest = path.get(index..)?;
        if case_sensitive {
            return rest
                .starts_with(self.text.as_str())
                .then_some(self.text.len());
        }

        let mut actual = rest.char_indices();
        for expected in self.text.chars() {
            let (_, found) = actual.next()?;
            if found != expected && !found.to_lowercase().eq(expected.to_lowercase()) {
                return None;
            }
        }
        Some(actual.next().map_or(rest.len(), |(offset, _)| offset))
    }

    /// Keep the first `at` bytes as this node's text and push the remainder,
    /// together with the existing children, down into a single new child.
    ///
    /// `at` must lie on a char boundary and be shorter than the text.
    pub(crate) fn split_at(&mut self, at: usize) {
        let suffix = self.text.split_off(at);
        let children = std::mem::take(&mut self.children);
        self.children = vec![Node::Static(Static::new(suffix, children))];
    }
}

/// A named (or anonymous) capture; used for both parameters and wildcards.
#[derive(Debug)]
pub struct Capture<H> {
    pub(crate) name: String,
    pub(crate) children: Vec<Node<H>>,
}

impl<H> Capture<H> {
    pub(crate) fn new(name: impl Into<String>, children: Vec<Node<H>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Capture name; empty for non-capturing tokens.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }
}

/// A trie node.
#[derive(Debug)]
pub enum Node<H> {
    Layer(Layer<H>),
    Static(Static<H>),
    /// Matches up to the next `/` or the end of the path.
    Parameter(Capture<H>),
    /// Matches the remainder of the path.
    Wildcard(Capture<H>),
    Fragment(Fragment<H>),
}

impl<H> Node<H> {
    /// Child chain of the node, `None` for layers.
    pub fn children(&self) -> Option<&[Node<H>]> {
        match self {
            Node::Layer(_) => None,
            Node::Static(node) => Some(&node.children),
            Node::Parameter(node) | Node::Wildcard(node) => Some(&node.children),
            Node::Fragment(node) => Some(&node.children),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node<H>>> {
        match self {
            Node::Layer(_) => None,
            Node::Static(node) => Some(&mut node.children),
            Node::Parameter(node) | Node::Wildcard(node) => Some(&mut node.children),
            Node::Fragment(node) => Some(&mut node.children),
        }
    }

    /// Short variant name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Layer(_) => "layer",
            Node::Static(_) => "static",
            Node::Parameter(_) => "parameter",
            Node::Wildcard(_) => "wildcard",
            Node::Fragment(node) if node.is_boundary => "boundary",
            Node::Fragment(_) => "fragment",
        }
    }
}

/// Length in bytes of the longest common prefix of `a` and `b`, never
/// splitting a multi-byte character.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, left), right)| left != right)
        .map_or_else(|| a.len().min(b.len()), |((index, _), _)| index)
}
