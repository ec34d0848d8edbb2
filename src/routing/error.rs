//! Routing error types.
//!
//! Registration errors are raised synchronously before the trie is touched.
//! Lookup errors only signal trie corruption; "no match" is an empty result.

use thiserror::Error;

/// Errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// `add` was called without any handler.
    #[error("You must provide at least one handler")]
    EmptyHandlers,

    /// A nested router or fragment was registered with a method predicate.
    #[error("Nested routers and fragments cannot be added with methods")]
    ScopeWithMethods,

    /// A `:` capture appears after the `*` token.
    #[error("Invalid parameter capture after wildcard in \"{path}\"")]
    CaptureAfterWildcard { path: String },

    /// Two `:` captures without a `/` between them.
    #[error("Invalid multiple parameter captures in \"{path}\"")]
    AdjacentCaptures { path: String },
}

/// Errors raised during lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The match stream is structurally inconsistent. Never retried.
    #[error("Routing trie is corrupted: {0}")]
    Corrupted(&'static str),
}
