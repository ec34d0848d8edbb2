//! Route registration and lookup.
//!
//! # Responsibilities
//! - Own the trie root and accept registrations (compile, then merge)
//! - Resolve a method + path into the dispatch-ready layer sequence
//! - Render the trie for diagnostics
//!
//! # Design Decisions
//! - A `Router` is a boundary, a `Fragment` is transparent grouping; both are
//!   the same node type and differ only in the `is_boundary` flag
//! - Registration is fully validated before the tree is touched
//! - Lookup borrows the tree immutably; a built router is safe to share
//! - Dropping a fragment dismantles its subtree iteratively
//!
//! # Data Flow
//! ```text
//! add(methods, path, handles)
//!     → compiler::compile (prefix + path)
//!     → merge::concat into the scope's children
//!
//! lookup(method, path, seed)
//!     → lookup::match_pass (raw event stream)
//!     → reduce::reduce (boundary all-or-nothing)
//!     → Vec<MatchedLayer>
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use axum::http::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::observability::metrics;
use crate::routing::compiler::compile;
use crate::routing::error::{LookupError, RegistrationError};
use crate::routing::lookup::{match_pass, MatchedLayer};
use crate::routing::merge::concat;
use crate::routing::node::{Methods, Node};
use crate::routing::params::Params;
use crate::routing::reduce::reduce;

/// Per-scope routing options.
///
/// `None` inherits the enclosing scope's setting; the top-level router
/// defaults to case-insensitive, non-strict matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingOptions {
    /// Prepended to every path registered on the scope.
    pub prefix: String,
    pub case_sensitive: Option<bool>,
    pub strict: Option<bool>,
}

impl RoutingOptions {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = Some(enabled);
        self
    }

    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = Some(enabled);
        self
    }
}

/// One argument of a registration call.
#[derive(Debug)]
pub enum Handle<H> {
    /// A middleware or handler reference.
    Layer(H),
    /// A nested fragment or router.
    Scope(Fragment<H>),
}

impl<H> From<Fragment<H>> for Handle<H> {
    fn from(fragment: Fragment<H>) -> Self {
        Handle::Scope(fragment)
    }
}

impl<H> From<Router<H>> for Handle<H> {
    fn from(router: Router<H>) -> Self {
        Handle::Scope(router.into_fragment())
    }
}

/// A routing scope: an ordered child chain plus optional overrides.
#[derive(Debug)]
pub struct Fragment<H> {
    pub(crate) prefix: String,
    pub(crate) case_sensitive: Option<bool>,
    pub(crate) strict: Option<bool>,
    pub(crate) is_boundary: bool,
    pub(crate) children: Vec<Node<H>>,
}

impl<H> Fragment<H> {
    /// Create a transparent grouping scope.
    pub fn new(options: RoutingOptions) -> Self {
        Self::with_kind(options, false)
    }

    pub(crate) fn boundary(options: RoutingOptions) -> Self {
        Self::with_kind(options, true)
    }

    fn with_kind(options: RoutingOptions, is_boundary: bool) -> Self {
        debug!(
            prefix = %options.prefix,
            case_sensitive = ?options.case_sensitive,
            strict = ?options.strict,
            is_boundary,
            "scope created"
        );
        Self {
            prefix: options.prefix,
            case_sensitive: options.case_sensitive,
            strict: options.strict,
            is_boundary,
            children: Vec::new(),
        }
    }

    /// Register `handles` under `methods` at `path` (relative to the prefix).
    pub fn add(
        &mut self,
        methods: Methods,
        path: &str,
        handles: Vec<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError> {
        let full_path = format!("{}{}", self.prefix, path);
        let kind = registration_kind(&methods, &handles);
        let count = handles.len();

        debug!(%methods, path = %full_path, handles = count, "adding route");
        let chain = compile(methods, &full_path, handles)?;
        concat(&mut self.children, chain);
        metrics::record_registration(kind);

        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn case_sensitive(&self) -> Option<bool> {
        self.case_sensitive
    }

    pub fn strict(&self) -> Option<bool> {
        self.strict
    }

    pub fn is_boundary(&self) -> bool {
        self.is_boundary
    }

    pub fn children(&self) -> &[Node<H>] {
        &self.children
    }
}

impl<H> Drop for Fragment<H> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children_mut() {
                pending.append(children);
            }
        }
    }
}

/// Shorthand registration methods shared by routers and fragments.
pub trait Routes<H>: Sized {
    fn add(
        &mut self,
        methods: Methods,
        path: &str,
        handles: Vec<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError>;

    fn get(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::only([Method::GET]), path, vec![Handle::Layer(handler)])
    }

    fn post(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::only([Method::POST]), path, vec![Handle::Layer(handler)])
    }

    fn put(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::only([Method::PUT]), path, vec![Handle::Layer(handler)])
    }

    fn patch(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::only([Method::PATCH]), path, vec![Handle::Layer(handler)])
    }

    fn delete(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::only([Method::DELETE]), path, vec![Handle::Layer(handler)])
    }

    /// Handler for every method.
    fn all(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::All, path, vec![Handle::Layer(handler)])
    }

    /// Middleware: matches any method and any remaining path under `path`.
    fn middleware(&mut self, path: &str, handler: H) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::middleware(), path, vec![Handle::Layer(handler)])
    }

    /// Mount a nested router (boundary) or fragment (transparent) at `path`.
    fn mount(
        &mut self,
        path: &str,
        scope: impl Into<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError> {
        self.add(Methods::middleware(), path, vec![scope.into()])
    }
}

impl<H> Routes<H> for Fragment<H> {
    fn add(
        &mut self,
        methods: Methods,
        path: &str,
        handles: Vec<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError> {
        Fragment::add(self, methods, path, handles)
    }
}

/// The top-level routing boundary.
#[derive(Debug)]
pub struct Router<H> {
    root: Fragment<H>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new(RoutingOptions::default())
    }
}

impl<H> Router<H> {
    pub fn new(options: RoutingOptions) -> Self {
        Self {
            root: Fragment::boundary(options),
        }
    }

    /// Register `handles` under `methods` at `path`.
    pub fn add(
        &mut self,
        methods: Methods,
        path: &str,
        handles: Vec<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError> {
        self.root.add(methods, path, handles)?;
        Ok(self)
    }

    /// Resolve `method` + `path` into the ordered layers to dispatch.
    ///
    /// An empty result means no handler matched; nothing should run.
    pub fn lookup(
        &self,
        method: &Method,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Vec<MatchedLayer<'_, H>>, LookupError> {
        let seed = Arc::new(params.cloned().unwrap_or_default());
        let events = match_pass(&self.root, method, path, seed);
        let event_count = events.len();

        match reduce(events) {
            Ok(layers) => {
                debug!(
                    %method,
                    path,
                    events = event_count,
                    layers = layers.len(),
                    "lookup complete"
                );
                metrics::record_lookup(layers.len());
                Ok(layers)
            }
            Err(err) => {
                warn!(%method, path, error = %err, "lookup aborted");
                metrics::record_lookup_corrupted();
                Err(err)
            }
        }
    }

    pub fn root(&self) -> &Fragment<H> {
        &self.root
    }

    /// Unwrap into the boundary fragment, for mounting in another router.
    pub fn into_fragment(self) -> Fragment<H> {
        self.root
    }
}

impl<H: fmt::Debug> Router<H> {
    /// Indented text dump of the whole trie, one node per line.
    pub fn render(&self) -> String {
        let mut out = fragment_label(&self.root);
        out.push('\n');
        render_into(&mut out, &self.root.children, 1);
        out
    }
}

impl<H> Routes<H> for Router<H> {
    fn add(
        &mut self,
        methods: Methods,
        path: &str,
        handles: Vec<Handle<H>>,
    ) -> Result<&mut Self, RegistrationError> {
        Router::add(self, methods, path, handles)
    }
}

fn registration_kind<H>(methods: &Methods, handles: &[Handle<H>]) -> &'static str {
    if handles.iter().any(|h| matches!(h, Handle::Scope(_))) {
        "scope"
    } else if methods.is_middleware() {
        "middleware"
    } else {
        "handler"
    }
}

/// Render a node chain, one node per line, two spaces per level.
#[cfg(test)]
pub(crate) fn render_chain<H: fmt::Debug>(chain: &[Node<H>]) -> String {
    let mut out = String::new();
    render_into(&mut out, chain, 0);
    out
}

fn render_into<H: fmt::Debug>(out: &mut String, chain: &[Node<H>], depth: usize) {
    let mut stack: Vec<(&Node<H>, usize)> = chain.iter().rev().map(|n| (n, depth)).collect();

    while let Some((node, depth)) = stack.pop() {
        let label = match node {
            Node::Layer(layer) => {
                let mut label = format!("layer {} -> {:?}", layer.methods, layer.handler);
                if layer.ends_with_slash {
                    label.push_str(" (trailing slash)");
                }
                label
            }
            Node::Static(node) => format!("static {:?}", node.text),
            Node::Parameter(node) => format!("parameter :{}", node.name),
            Node::Wildcard(node) => format!("wildcard *{}", node.name),
            Node::Fragment(node) => fragment_label(node),
        };
        let _ = writeln!(out, "{:indent$}{}", "", label, indent = depth * 2);

        if let Some(children) = node.children() {
            stack.extend(children.iter().rev().map(|child| (child, depth + 1)));
        }
    }
}

fn fragment_label<H>(fragment: &Fragment<H>) -> String {
    let mut label = String::from(if fragment.is_boundary {
        "boundary"
    } else {
        "fragment"
    });
    if let Some(enabled) = fragment.case_sensitive {
        let _ = write!(label, " case_sensitive={}", enabled);
    }
    if let Some(enabled) = fragment.strict {
        let _ = write!(label, " strict={}", enabled);
    }
    label
}
