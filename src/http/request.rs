//! Request adapter.
//!
//! # Responsibilities
//! - Extract the method and path the router dispatches on
//! - Pick up parameters bound by an enclosing router (request extensions)
//!
//! # Design Decisions
//! - Only `uri().path()` is used; the query string never reaches the trie
//! - The path is passed through as-is; the host owns percent-normalization

use axum::http::{Method, Request};

use crate::routing::error::LookupError;
use crate::routing::lookup::MatchedLayer;
use crate::routing::params::Params;
use crate::routing::router::Router;

/// Anything the router can be dispatched on.
pub trait RequestTarget {
    fn method(&self) -> &Method;

    fn path(&self) -> &str;

    /// Parameters captured before this router was reached.
    fn seed_params(&self) -> Option<&Params> {
        None
    }
}

impl<B> RequestTarget for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn seed_params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }
}

impl<H> Router<H> {
    /// Resolve a host request.
    ///
    /// `seed` takes precedence over parameters stored on the request.
    pub fn lookup_request<'r, T>(
        &'r self,
        target: &T,
        seed: Option<&Params>,
    ) -> Result<Vec<MatchedLayer<'r, H>>, LookupError>
    where
        T: RequestTarget + ?Sized,
    {
        let seed = seed.or_else(|| target.seed_params());
        self.lookup(target.method(), target.path(), seed)
    }
}
