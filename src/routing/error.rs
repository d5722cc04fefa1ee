//! Routing configuration errors.
//!
//! Every variant is a programmer error in the route table. Registration
//! returns them eagerly so startup can abort; a lookup miss is never an error.

use thiserror::Error;

/// Errors raised while building or querying a [`PathTree`](super::PathTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two differently named variables registered at the same position.
    #[error("overlapping variables at {pattern:?}: :{existing} / :{requested}")]
    VariableConflict {
        pattern: String,
        existing: String,
        requested: String,
    },

    /// A `:` segment without a name.
    #[error("empty variable name in {pattern:?}")]
    EmptyVariable { pattern: String },

    /// A second `*` registered at the same position.
    #[error("overlapping fallback routes at {pattern:?}")]
    DuplicateWildcard { pattern: String },

    /// Segments following a `*`, which lookup could never reach.
    #[error("wildcard must be the last segment: {pattern:?}")]
    WildcardNotLast { pattern: String },

    /// A handler attached twice to the same node.
    #[error("duplicate handler for {pattern:?}")]
    DuplicateHandler { pattern: String },

    /// A lookup path that does not start with `/`.
    #[error("bad path {path:?}: must start with '/'")]
    MalformedPath { path: String },
}
