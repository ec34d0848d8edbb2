//! Route manifest subsystem.
//!
//! # Data Flow
//! ```text
//! manifest file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → loader::build_router → Router<String>
//!     → published through SharedRouter
//!
//! On reload:
//!     loader::reload loads, validates and builds a new router
//!     → SharedRouter::replace swaps it in atomically
//!     → on any error the current router stays in place
//! ```
//!
//! # Design Decisions
//! - Handlers are referenced by name; the host maps names to functions
//! - All fields have defaults to allow minimal manifests
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{build_router, load_config, parse_config, reload, ConfigError};
pub use schema::{MethodsConfig, ObservabilityConfig, RouteConfig, RouterConfig, ScopeConfig};
pub use validation::{validate_config, ValidationError};
