//! Route tables compiled from configuration.

use thiserror::Error;

use crate::config::RouteConfig;

use super::error::RouteError;
use super::tree::PathTree;

/// A configured route that could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route {route:?}: {source}")]
pub struct TableError {
    /// Name of the offending route.
    pub route: String,
    pub source: RouteError,
}

/// Register every route, attaching the value produced by `make_handler`.
///
/// All conflicts are reported, not just the first one.
pub fn compile<H>(
    routes: &[RouteConfig],
    mut make_handler: impl FnMut(&RouteConfig) -> H,
) -> Result<PathTree<H>, Vec<TableError>> {
    let mut tree = PathTree::new();
    let mut errors = Vec::new();

    for route in routes {
        if let Err(source) = tree.insert(&route.path, make_handler(route)) {
            errors.push(TableError {
                route: route.name.clone(),
                source,
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!(routes = routes.len(), "Route table compiled");
    Ok(tree)
}
