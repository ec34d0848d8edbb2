//! Path and method dispatcher built on a compressed prefix trie, with
//! all-or-nothing middleware per mounted router.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::RequestTarget;
pub use routing::{
    Fragment, Handle, LookupError, MatchedLayer, Methods, Params, RegistrationError, Router,
    Routes, RoutingOptions, SharedRouter,
};
