//! HTTP host integration.
//!
//! # Data Flow
//! ```text
//! Host framework request (axum::http::Request)
//!     → request.rs (method, path, seed params from extensions)
//!     → Router::lookup
//!     → Ordered layers handed back to the host for composition
//! ```

pub mod request;

pub use request::RequestTarget;
