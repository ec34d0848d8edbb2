//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (before traffic):
//!     add(methods, path, handles)
//!     → compiler.rs (validate, build one node chain right-to-left)
//!     → merge.rs (concat chain into the scope's children, split static prefixes)
//!     → Router frozen and handed to shared.rs
//!
//! Request:
//!     lookup(method, path, seed params)
//!     → lookup.rs (pass 1: explicit-stack DFS, raw match event stream)
//!     → reduce.rs (pass 2: drop boundaries that produced no handler)
//!     → Return: ordered Vec<MatchedLayer> (empty = no match)
//! ```
//!
//! # Design Decisions
//! - Nodes are a closed enum; boundary vs transparent grouping is a flag on
//!   `Fragment`, not a separate variant
//! - Merge and lookup are iterative so nesting depth never touches the call stack
//! - Registration order is never changed; only adjacent siblings merge
//! - Parameter maps are copy-on-write, sibling branches never see each other's captures
//! - Immutable after registration (lookups need no locks)

pub mod compiler;
pub mod error;
pub mod lookup;
pub mod merge;
pub mod node;
pub mod params;
pub mod reduce;
pub mod router;
pub mod shared;

pub use error::{LookupError, RegistrationError};
pub use lookup::{MatchEvent, MatchedLayer};
pub use node::{Capture, Layer, Methods, Node, Static};
pub use params::{safe_decode, Params};
pub use router::{Fragment, Handle, Router, Routes, RoutingOptions};
pub use shared::SharedRouter;
