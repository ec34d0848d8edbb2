//! Path compiler.
//!
//! # Responsibilities
//! - Validate one registration call (handles, method predicate, path syntax)
//! - Turn the path into a single node chain ending in the registered layers
//!
//! # Design Decisions
//! - Validation completes before any node is built, so a failed registration
//!   never leaves a partial chain behind
//! - The chain is built right-to-left: wildcard first, then each `:` capture
//!   from the rightmost backwards, then the remaining literal prefix
//! - A parameter consumes the `/` that terminates it; the literal suffix
//!   after a capture starts past that slash

use tracing::trace;

use crate::routing::error::RegistrationError;
use crate::routing::node::{Capture, Layer, Methods, Node, Static};
use crate::routing::router::Handle;

/// Check the capture syntax of a registration path.
///
/// Rejects a `:` capture anywhere after `*`, and two `:` captures that are
/// not separated by a `/`.
pub fn validate_path(path: &str) -> Result<(), RegistrationError> {
    let head = match path.find('*') {
        Some(star) => {
            if path[star..].contains(':') {
                return Err(RegistrationError::CaptureAfterWildcard {
                    path: path.to_string(),
                });
            }
            &path[..star]
        }
        None => path,
    };

    if head
        .split('/')
        .any(|segment| segment.matches(':').count() > 1)
    {
        return Err(RegistrationError::AdjacentCaptures {
            path: path.to_string(),
        });
    }

    Ok(())
}

/// Compile one registration call into a node chain.
pub fn compile<H>(
    methods: Methods,
    path: &str,
    handles: Vec<Handle<H>>,
) -> Result<Vec<Node<H>>, RegistrationError> {
    if handles.is_empty() {
        return Err(RegistrationError::EmptyHandlers);
    }

    let is_middleware = methods.is_middleware();
    if !is_middleware && handles.iter().any(|h| matches!(h, Handle::Scope(_))) {
        return Err(RegistrationError::ScopeWithMethods);
    }

    let (path, ends_with_slash) = match path.strip_suffix('/') {
        Some(trimmed) => (trimmed, true),
        None => (path, false),
    };

    validate_path(path)?;

    let mut chain: Vec<Node<H>> = handles
        .into_iter()
        .map(|handle| match handle {
            Handle::Layer(handler) => Node::Layer(Layer {
                methods: methods.clone(),
                handler,
                is_middleware,
                ends_with_slash,
            }),
            Handle::Scope(fragment) => Node::Fragment(fragment),
        })
        .collect();

    let mut rest = path;

    if let Some(star) = rest.find('*') {
        let name = &rest[star + 1..];
        trace!(capture = name, "wildcard");
        chain = vec![Node::Wildcard(Capture::new(name, chain))];
        rest = &rest[..star];
    }

    while let Some(start) = rest.rfind(':') {
        let end = rest[start..]
            .find('/')
            .map_or(rest.len(), |offset| start + offset);

        if let Some(suffix) = rest.get(end + 1..).filter(|s| !s.is_empty()) {
            trace!(text = suffix, "static");
            chain = vec![Node::Static(Static::new(suffix, chain))];
        }

        let name = &rest[start + 1..end];
        trace!(capture = name, "parameter");
        chain = vec![Node::Parameter(Capture::new(name, chain))];
        rest = &rest[..start];
    }

    if !rest.is_empty() {
        trace!(text = rest, "static");
        chain = vec![Node::Static(Static::new(rest, chain))];
    }

    Ok(chain)
}
