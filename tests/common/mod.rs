//! Shared helpers for integration tests.

use axum::body::Body;
use axum::http::{Method, Request};
use branch_router::{Params, Router};

/// Handler names of a lookup, in dispatch order.
pub fn trace(router: &Router<&'static str>, method: Method, path: &str) -> Vec<&'static str> {
    router
        .lookup(&method, path, None)
        .unwrap()
        .into_iter()
        .map(|layer| *layer.handler)
        .collect()
}

/// Comma-joined handler names, mirroring a chain where every layer appends its id.
#[allow(dead_code)]
pub fn body(router: &Router<&'static str>, method: Method, path: &str) -> String {
    trace(router, method, path).join(",")
}

/// Parameters bound for the last layer of a lookup.
#[allow(dead_code)]
pub fn last_params(router: &Router<&'static str>, method: Method, path: &str) -> Params {
    router
        .lookup(&method, path, None)
        .unwrap()
        .last()
        .map(|layer| (*layer.params).clone())
        .unwrap_or_default()
}

/// Parameters bound for the layer registered as `handler`.
#[allow(dead_code)]
pub fn params_of(
    router: &Router<&'static str>,
    method: Method,
    path: &str,
    handler: &str,
) -> Option<Params> {
    router
        .lookup(&method, path, None)
        .unwrap()
        .into_iter()
        .find(|layer| *layer.handler == handler)
        .map(|layer| (*layer.params).clone())
}

/// Names resolved by a manifest-built router.
#[allow(dead_code)]
pub fn trace_named(router: &Router<String>, method: Method, path: &str) -> Vec<String> {
    router
        .lookup(&method, path, None)
        .unwrap()
        .into_iter()
        .map(|layer| layer.handler.clone())
        .collect()
}

#[allow(dead_code)]
pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::default())
        .unwrap()
}
