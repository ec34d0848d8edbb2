//! Manifest schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML manifests.

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::routing::node::Methods;
use crate::routing::router::RoutingOptions;

/// Root of a route manifest.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Options of the top-level router.
    pub router: RoutingOptions,

    /// Registrations, in order.
    pub routes: Vec<RouteConfig>,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// One registration call.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Method predicate; omitted means middleware.
    pub methods: MethodsConfig,

    /// Path relative to the enclosing scope's prefix.
    pub path: String,

    /// Handler names, in order.
    pub handlers: Vec<String>,

    /// Nested scope mounted at `path` instead of handlers.
    pub mount: Option<ScopeConfig>,
}

/// Method predicate as written in a manifest.
///
/// `"*"` selects every method; a single name or a list selects those
/// methods; an empty list registers middleware.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MethodsConfig {
    One(String),
    List(Vec<String>),
}

impl Default for MethodsConfig {
    fn default() -> Self {
        MethodsConfig::List(Vec::new())
    }
}

impl MethodsConfig {
    pub fn is_middleware(&self) -> bool {
        matches!(self, MethodsConfig::List(list) if list.is_empty())
    }

    fn names(&self) -> &[String] {
        match self {
            MethodsConfig::One(name) => std::slice::from_ref(name),
            MethodsConfig::List(list) => list,
        }
    }

    /// Convert to a routing predicate.
    ///
    /// Returns the first unrecognised method name as the error.
    pub fn resolve(&self) -> Result<Methods, String> {
        let names = self.names();
        if names.iter().any(|name| name == "*") {
            return Ok(Methods::All);
        }
        let mut methods = Vec::with_capacity(names.len());
        for name in names {
            methods.push(parse_method(name).ok_or_else(|| name.clone())?);
        }
        Ok(Methods::only(methods))
    }
}

/// Standard method from its (case-insensitive) name.
fn parse_method(name: &str) -> Option<Method> {
    let method = match name.to_ascii_uppercase().as_str() {
        "GET" => Method::GET,
        "HEAD" => Method::HEAD,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "DELETE" => Method::DELETE,
        "CONNECT" => Method::CONNECT,
        "OPTIONS" => Method::OPTIONS,
        "TRACE" => Method::TRACE,
        "PATCH" => Method::PATCH,
        _ => return None,
    };
    Some(method)
}

/// A nested router or fragment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Prepended to every path registered in this scope.
    pub prefix: String,

    /// Overrides the inherited case sensitivity.
    pub case_sensitive: Option<bool>,

    /// Overrides the inherited trailing-slash strictness.
    pub strict: Option<bool>,

    /// Mount as a router (all-or-nothing) rather than a transparent fragment.
    pub boundary: bool,

    pub routes: Vec<RouteConfig>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            case_sensitive: None,
            strict: None,
            boundary: true,
            routes: Vec::new(),
        }
    }
}

impl ScopeConfig {
    pub fn options(&self) -> RoutingOptions {
        RoutingOptions {
            prefix: self.prefix.clone(),
            case_sensitive: self.case_sensitive,
            strict: self.strict,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error, or an `EnvFilter` directive).
    pub log_level: String,

    /// Record lookup and registration metrics.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
