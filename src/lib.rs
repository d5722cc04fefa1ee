//! Tree-based URL path router.
//!
//! Paths are sequences of slash-separated segments; there are no regexes.
//! Routes form a tree of matchers, so these two registrations reach the
//! same node:
//!
//! ```
//! # use route_tree::PathTree;
//! let mut tree: PathTree<&str> = PathTree::new();
//! tree.route("user")?.route("new")?.set_handler("new user")?;
//! assert!(tree.insert("/user/new", "again").is_err());
//! # Ok::<(), route_tree::RouteError>(())
//! ```
//!
//! Segments starting with `:` capture one path component, and a final `*`
//! captures the rest of the path:
//!
//! ```
//! # use route_tree::PathTree;
//! let mut tree = PathTree::new();
//! tree.insert("/users/:name/greet", "greet")?;
//! tree.insert("/static/*", "static")?;
//!
//! let m = tree.lookup("/users/foobar/greet")?.unwrap();
//! assert_eq!(m.captures().get("name"), Some("foobar"));
//!
//! let m = tree.lookup("/static/css/site.css")?.unwrap();
//! assert_eq!(m.captures().wildcard(), Some("css/site.css"));
//! # Ok::<(), route_tree::RouteError>(())
//! ```
//!
//! The trailing slash matters: `/foo` and `/foo/` are different routes.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Captures, Handler, Match, Node, PathTree, RouteError, Router};
