//! Match pass.
//!
//! # Responsibilities
//! - Walk the frozen trie depth-first for one method + path
//! - Emit a flat, ordered stream of layer matches and boundary delimiters
//!
//! # Design Decisions
//! - Explicit work stack; children are pushed in reverse so they pop in
//!   registration order
//! - Scope settings (case sensitivity, strict) live in one "current" slot;
//!   entering a fragment pushes an exit sentinel carrying the parent's
//!   settings, which restores them (and closes a boundary) when popped
//! - The path is trimmed of one trailing `/` once up front

use std::sync::Arc;

use axum::http::Method;

use crate::routing::node::Node;
use crate::routing::params::{safe_decode, Params};
use crate::routing::router::Fragment;

/// A layer selected for dispatch.
#[derive(Debug)]
pub struct MatchedLayer<'r, H> {
    pub is_middleware: bool,
    pub params: Arc<Params>,
    pub handler: &'r H,
}

// Manual impl: a derive would require `H: Clone`.
impl<H> Clone for MatchedLayer<'_, H> {
    fn clone(&self) -> Self {
        Self {
            is_middleware: self.is_middleware,
            params: self.params.clone(),
            handler: self.handler,
        }
    }
}

/// One event of the raw match stream.
#[derive(Debug)]
pub enum MatchEvent<'r, H> {
    Layer(MatchedLayer<'r, H>),
    BoundaryStart,
    BoundaryEnd,
}

/// Case and trailing-slash rules of the scope being walked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Scope {
    pub case_sensitive: bool,
    pub strict: bool,
}

impl Scope {
    fn enter<H>(self, fragment: &Fragment<H>) -> Self {
        Self {
            case_sensitive: fragment.case_sensitive.unwrap_or(self.case_sensitive),
            strict: fragment.strict.unwrap_or(self.strict),
        }
    }
}

enum Work<'r, H> {
    Visit {
        node: &'r Node<H>,
        index: usize,
        params: Arc<Params>,
    },
    Exit {
        parent: Scope,
        boundary: bool,
    },
}

struct Request<'a> {
    method: &'a Method,
    path: &'a str,
    ends_with_slash: bool,
}

/// Run the match pass from `root` (entered as a scope of its own).
pub(crate) fn match_pass<'r, H>(
    root: &'r Fragment<H>,
    method: &Method,
    path: &str,
    seed: Arc<Params>,
) -> Vec<MatchEvent<'r, H>> {
    let (path, ends_with_slash) = match path.strip_suffix('/') {
        Some(trimmed) => (trimmed, true),
        None => (path, false),
    };
    let request = Request {
        method,
        path,
        ends_with_slash,
    };

    let mut events = Vec::new();
    let mut stack = Vec::new();
    let mut scope = enter_fragment(
        root,
        Scope::default(),
        0,
        &seed,
        &mut stack,
        &mut events,
    );

    while let Some(work) = stack.pop() {
        let (node, index, params) = match work {
            Work::Visit {
                node,
                index,
                params,
            } => (node, index, params),
            Work::Exit { parent, boundary } => {
                scope = parent;
                if boundary {
                    events.push(MatchEvent::BoundaryEnd);
                }
                continue;
            }
        };

        match node {
            Node::Layer(layer) => {
                let accepted = layer.is_middleware
                    || (index >= request.path.len()
                        && (!scope.strict || layer.ends_with_slash == request.ends_with_slash)
                        && layer.methods.allows(request.method));
                if accepted {
                    events.push(MatchEvent::Layer(MatchedLayer {
                        is_middleware: layer.is_middleware,
                        params,
                        handler: &layer.handler,
                    }));
                }
            }
            Node::Static(node) => {
                if let Some(consumed) = node.match_at(request.path, index, scope.case_sensitive) {
                    push_children(&mut stack, &node.children, index + consumed, &params);
                }
            }
            Node::Parameter(node) => {
                let start = index.min(request.path.len());
                let rest = request.path.get(start..).unwrap_or("");
                let end = rest.find('/').map_or(request.path.len(), |offset| start + offset);
                let params = if node.name.is_empty() {
                    params
                } else {
                    let raw = request.path.get(start..end).unwrap_or("");
                    Arc::new(params.with(&node.name, safe_decode(raw)))
                };
                push_children(&mut stack, &node.children, end + 1, &params);
            }
            Node::Wildcard(node) => {
                let start = index.min(request.path.len());
                let params = if node.name.is_empty() {
                    params
                } else {
                    let rest = request.path.get(start..).unwrap_or("");
                    Arc::new(params.with(&node.name, rest.to_string()))
                };
                push_children(&mut stack, &node.children, request.path.len(), &params);
            }
            Node::Fragment(fragment) => {
                scope = enter_fragment(fragment, scope, index, &params, &mut stack, &mut events);
            }
        }
    }

    events
}

/// Open a fragment scope: queue its exit sentinel, then its children.
/// Returns the settings in force inside the fragment.
fn enter_fragment<'r, H>(
    fragment: &'r Fragment<H>,
    parent: Scope,
    index: usize,
    params: &Arc<Params>,
    stack: &mut Vec<Work<'r, H>>,
    events: &mut Vec<MatchEvent<'r, H>>,
) -> Scope {
    if fragment.is_boundary {
        events.push(MatchEvent::BoundaryStart);
    }
    stack.push(Work::Exit {
        parent,
        boundary: fragment.is_boundary,
    });
    push_children(stack, &fragment.children, index, params);
    parent.enter(fragment)
}

fn push_children<'r, H>(
    stack: &mut Vec<Work<'r, H>>,
    children: &'r [Node<H>],
    index: usize,
    params: &Arc<Params>,
) {
    for node in children.iter().rev() {
        stack.push(Work::Visit {
            node,
            index,
            params: params.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::node::{Capture, Layer, Methods, Static};
    use crate::routing::router::RoutingOptions;

    fn handler(methods: Methods, tag: &'static str) -> Node<&'static str> {
        Node::Layer(Layer {
            is_middleware: methods.is_middleware(),
            methods,
            handler: tag,
            ends_with_slash: false,
        })
    }

    fn root(children: Vec<Node<&'static str>>) -> Fragment<&'static str> {
        let mut fragment = Fragment::new(RoutingOptions::default());
        fragment.children = children;
        fragment
    }

    fn layers(events: &[MatchEvent<'_, &'static str>]) -> Vec<&'static str> {
        events
            .iter()
            .filter_map(|event| match event {
                MatchEvent::Layer(layer) => Some(*layer.handler),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_finds_handlers_for_method() {
        let tree = root(vec![
            handler(Methods::only([Method::GET]), "get"),
            handler(Methods::only([Method::POST]), "post"),
        ]);
        let events = match_pass(&tree, &Method::POST, "", Arc::default());
        assert_eq!(layers(&events), vec!["post"]);
    }

    #[test]
    fn test_finds_handlers_for_all_methods() {
        let tree = root(vec![
            handler(Methods::only([Method::GET]), "get"),
            handler(Methods::All, "all"),
            handler(Methods::only([Method::POST]), "post"),
        ]);
        let events = match_pass(&tree, &Method::POST, "", Arc::default());
        assert_eq!(layers(&events), vec!["all", "post"]);
    }

    #[test]
    fn test_middleware_ignores_remaining_path() {
        let tree = root(vec![
            handler(Methods::middleware(), "mw"),
            handler(Methods::only([Method::POST]), "post"),
        ]);
        let events = match_pass(&tree, &Method::POST, "/deeper", Arc::default());
        assert_eq!(layers(&events), vec!["mw"]);
    }

    #[test]
    fn test_static_siblings() {
        let tree = root(vec![
            Node::Static(Static::new("/hello", vec![handler(Methods::only([Method::GET]), "hello")])),
            Node::Static(Static::new("/bye", vec![handler(Methods::only([Method::GET]), "bye")])),
        ]);
        let events = match_pass(&tree, &Method::GET, "/bye", Arc::default());
        assert_eq!(layers(&events), vec!["bye"]);
    }

    #[test]
    fn test_captures_params_between_statics() {
        let tree = root(vec![Node::Static(Static::new(
            "/before/",
            vec![Node::Parameter(Capture::new(
                "name",
                vec![Node::Static(Static::new(
                    "after",
                    vec![handler(Methods::only([Method::POST]), "h")],
                ))],
            ))],
        ))]);
        let events = match_pass(&tree, &Method::POST, "/before/anyong/after", Arc::default());
        assert_eq!(events.len(), 1);
        match &events[0] {
            MatchEvent::Layer(layer) => {
                assert_eq!(layer.params.get("name"), Some("anyong"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sibling_branches_do_not_share_params() {
        let tree = root(vec![
            Node::Static(Static::new(
                "/",
                vec![
                    Node::Parameter(Capture::new(
                        "a",
                        vec![handler(Methods::middleware(), "first")],
                    )),
                    handler(Methods::middleware(), "second"),
                ],
            )),
        ]);
        let events = match_pass(&tree, &Method::GET, "/x", Arc::default());
        let params: Vec<Option<&str>> = events
            .iter()
            .filter_map(|event| match event {
                MatchEvent::Layer(layer) => Some(layer.params.get("a")),
                _ => None,
            })
            .collect();
        assert_eq!(params, vec![Some("x"), None]);
    }

    #[test]
    fn test_root_emits_boundary_delimiters() {
        let mut tree = root(vec![handler(Methods::middleware(), "mw")]);
        tree.is_boundary = true;
        let events = match_pass(&tree, &Method::GET, "/", Arc::default());
        assert!(matches!(events.first(), Some(MatchEvent::BoundaryStart)));
        assert!(matches!(events.last(), Some(MatchEvent::BoundaryEnd)));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_seed_params_flow_through() {
        let tree = root(vec![handler(Methods::middleware(), "mw")]);
        let seed: Params = [("tenant", "acme")].into_iter().collect();
        let events = match_pass(&tree, &Method::GET, "/", Arc::new(seed));
        match &events[0] {
            MatchEvent::Layer(layer) => assert_eq!(layer.params.get("tenant"), Some("acme")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_scopes_without_recursion() {
        let depth = 200_000;
        let mut tree = root(vec![Node::Static(Static::new(
            "/x",
            vec![handler(Methods::only([Method::GET]), "h")],
        ))]);
        for level in 0..depth {
            let mut outer = Fragment::new(RoutingOptions::default());
            outer.is_boundary = level % 2 == 0;
            outer.children = vec![Node::Fragment(tree)];
            tree = outer;
        }

        let events = match_pass(&tree, &Method::GET, "/x", Arc::default());
        assert_eq!(layers(&events), vec!["h"]);
        assert_eq!(events.len(), depth + 1);

        let events = match_pass(&tree, &Method::GET, "/y", Arc::default());
        assert!(layers(&events).is_empty());
    }
}
