//! Manifest validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route has exactly one target (handlers or a mounted scope)
//! - Check method names and path capture syntax before anything is built
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Paths are checked with their own scope's prefix applied, exactly as
//!   registration will compile them

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::routing::compiler::validate_path;
use crate::routing::error::RegistrationError;

/// A semantic problem in a manifest. `route` locates the entry, e.g.
/// `routes[2].mount.routes[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{route}: route has neither handlers nor a mounted scope")]
    MissingTarget { route: String },

    #[error("{route}: route has both handlers and a mounted scope")]
    AmbiguousTarget { route: String },

    #[error("{route}: mounted scopes cannot be restricted to methods")]
    MountWithMethods { route: String },

    #[error("{route}: unknown method \"{method}\"")]
    UnknownMethod { route: String, method: String },

    #[error("{route}: {source}")]
    InvalidPath {
        route: String,
        source: RegistrationError,
    },

    #[error("observability.log_level: invalid filter \"{0}\"")]
    InvalidLogLevel(String),
}

/// Validate a parsed manifest.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_routes(&config.routes, &config.router.prefix, "routes", &mut errors);

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(
    routes: &[RouteConfig],
    prefix: &str,
    location: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (i, route) in routes.iter().enumerate() {
        let here = format!("{}[{}]", location, i);

        match (route.handlers.is_empty(), &route.mount) {
            (true, None) => errors.push(ValidationError::MissingTarget {
                route: here.clone(),
            }),
            (false, Some(_)) => errors.push(ValidationError::AmbiguousTarget {
                route: here.clone(),
            }),
            _ => {}
        }

        if route.mount.is_some() && !route.methods.is_middleware() {
            errors.push(ValidationError::MountWithMethods {
                route: here.clone(),
            });
        }

        if let Err(method) = route.methods.resolve() {
            errors.push(ValidationError::UnknownMethod {
                route: here.clone(),
                method,
            });
        }

        if let Err(source) = validate_path(&format!("{}{}", prefix, route.path)) {
            errors.push(ValidationError::InvalidPath {
                route: here.clone(),
                source,
            });
        }

        if let Some(scope) = &route.mount {
            validate_routes(
                &scope.routes,
                &scope.prefix,
                &format!("{}.mount.routes", here),
                errors,
            );
        }
    }
}
