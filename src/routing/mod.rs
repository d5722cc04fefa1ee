//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     route("/users/:id") / RouteConfig[]
//!     → tree.rs (extend the tree, reject conflicts)
//!     → handler.rs (attach func / func_e)
//!     → Freeze as immutable Router
//!
//! Incoming Request (path)
//!     → router.rs (dispatch)
//!     → tree.rs (segment walk: literal → variable → wildcard)
//!     → Return: handler + Captures, or NoMatch (404)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: paths are sequences of slash-separated segments
//! - Deterministic: same input always matches same route
//! - Configuration conflicts are errors at registration, never at request time

pub mod captures;
pub mod error;
pub mod handler;
pub mod router;
pub mod table;
pub mod tree;

pub use captures::{Captures, WILDCARD};
pub use error::RouteError;
pub use handler::{Handler, HandlerFuture};
pub use router::Router;
pub use table::TableError;
pub use tree::{Match, Node, PathTree};
