//! Manifest loading and router construction.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::error::RegistrationError;
use crate::routing::node::Methods;
use crate::routing::router::{Fragment, Handle, Router, Routes};
use crate::routing::shared::SharedRouter;

/// Error type for manifest loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Registration failed: {0}")]
    Registration(#[from] RegistrationError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a manifest from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate a manifest from TOML text.
pub fn parse_config(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::from_str(content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a router from a validated manifest. Handlers are their names.
pub fn build_router(config: &RouterConfig) -> Result<Router<String>, ConfigError> {
    let mut router = Router::new(config.router.clone());
    register(&mut router, &config.routes)?;

    tracing::info!(
        routes = config.routes.len(),
        prefix = %config.router.prefix,
        "Router built from manifest"
    );
    Ok(router)
}

fn register<S: Routes<String>>(scope: &mut S, routes: &[RouteConfig]) -> Result<(), ConfigError> {
    for route in routes {
        let handles = match &route.mount {
            Some(mount) => {
                let handle = if mount.boundary {
                    let mut nested = Router::new(mount.options());
                    register(&mut nested, &mount.routes)?;
                    Handle::from(nested)
                } else {
                    let mut nested = Fragment::new(mount.options());
                    register(&mut nested, &mount.routes)?;
                    Handle::from(nested)
                };
                vec![handle]
            }
            None => route.handlers.iter().cloned().map(Handle::Layer).collect(),
        };

        let methods = if route.mount.is_some() {
            Methods::middleware()
        } else {
            route
                .methods
                .resolve()
                .map_err(|method| {
                    ConfigError::Validation(vec![ValidationError::UnknownMethod {
                        route: route.path.clone(),
                        method,
                    }])
                })?
        };

        scope.add(methods, &route.path, handles)?;
    }
    Ok(())
}

/// Reload the manifest at `path` into `shared`.
///
/// On any error the currently published router is kept.
pub fn reload(path: &Path, shared: &SharedRouter<String>) -> Result<RouterConfig, ConfigError> {
    tracing::info!(path = ?path, "Route manifest reload requested");

    let outcome = load_config(path).and_then(|config| {
        let router = build_router(&config)?;
        Ok((config, router))
    });

    match outcome {
        Ok((config, router)) => {
            shared.replace(router);
            Ok(config)
        }
        Err(e) => {
            tracing::error!(
                "Failed to reload route manifest: {}. Keeping current routes.",
                e
            );
            Err(e)
        }
    }
}
