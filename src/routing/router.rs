//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Own the HTTP routing tree
//! - Look up the handler for an incoming request
//! - Invoke it with the captured path values, or answer 404 / 400
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Explicit not-found response rather than a silent default
//! - The request is handed to the handler unmodified
//! - Lookup sees the percent-decoded path, so `%2F` can split a segment

use std::fmt;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use percent_encoding::percent_decode_str;

use crate::config::RouteConfig;
use crate::http::request::request_id;
use crate::http::response;
use crate::observability::metrics::{self, Outcome};

use super::captures::Captures;
use super::error::RouteError;
use super::handler::Handler;
use super::table::{self, TableError};
use super::tree::{Node, PathTree};

/// HTTP router: a [`PathTree`] of [`Handler`]s plus request dispatch.
#[derive(Debug, Default)]
pub struct Router {
    tree: PathTree<Handler>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (creating as needed) the node for `path`, to attach a handler
    /// with [`Node::func`] or [`Node::func_e`] or to extend further.
    ///
    /// ```
    /// # use route_tree::Router;
    /// # async fn show(_: axum::http::Request<axum::body::Body>) -> &'static str { "" }
    /// let mut router = Router::new();
    /// let users = router.route("/users")?;
    /// users.route(":name")?.func(show)?;
    /// # Ok::<(), route_tree::RouteError>(())
    /// ```
    pub fn route(&mut self, path: &str) -> Result<&mut Node<Handler>, RouteError> {
        tracing::trace!(path = %path, "Route requested");
        self.tree.route(path)
    }

    /// Build a router serving the configured table with the echo handler.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, Vec<TableError>> {
        let tree = table::compile(routes, |route| {
            let name = route.name.clone();
            let pattern = route.path.clone();
            Handler::new(move |request: Request<Body>, captures: Captures| {
                let body = response::Echo {
                    route: name.clone(),
                    pattern: pattern.clone(),
                    path: request.uri().path().to_owned(),
                    captures,
                };
                async move { body }
            })
        })?;

        for route in routes {
            tracing::info!(name = %route.name, path = %route.path, "Route registered");
        }
        Ok(Self { tree })
    }

    pub fn tree(&self) -> &PathTree<Handler> {
        &self.tree
    }

    /// Dispatch a request to the matching handler.
    pub async fn dispatch(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let request_id = request_id(&request);
        let path = request.uri().path().to_owned();

        let found = match decode_path(&path).and_then(|decoded| self.tree.lookup(&decoded)) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(request_id = %request_id, path = %path, error = %e, "Malformed request path");
                metrics::record_request(Outcome::BadRequest, None, start_time);
                return response::bad_request(&e);
            }
        };

        let Some(matched) = found else {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(Outcome::NotFound, None, start_time);
            return response::not_found();
        };

        let pattern = matched.pattern();
        let handler = matched.handler().clone();
        tracing::debug!(
            request_id = %request_id,
            path = %path,
            route = %pattern,
            handler = handler.name(),
            "Route matched"
        );

        let response = handler.call(request, matched.into_captures()).await;
        metrics::record_request(Outcome::Matched, Some(pattern), start_time);
        response
    }
}

/// Percent-decode a request path. Escapes that do not form UTF-8 make the
/// path malformed.
fn decode_path(path: &str) -> Result<String, RouteError> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RouteError::MalformedPath {
            path: path.to_owned(),
        })
}

impl From<PathTree<Handler>> for Router {
    fn from(tree: PathTree<Handler>) -> Self {
        Self { tree }
    }
}

/// Route dump, see [`PathTree`]'s `Display`.
impl fmt::Display for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_hit() {
        let mut router = Router::new();
        router
            .route("/users/:name")
            .unwrap()
            .func_e(|request: Request<Body>, env: Captures| async move {
                format!("{} {}", request.uri().path(), env.get("name").unwrap_or_default())
            })
            .unwrap();

        let response = router.dispatch(get("/users/bob?x=1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"/users/bob bob");
    }

    #[tokio::test]
    async fn test_dispatch_miss_is_not_found() {
        let mut router = Router::new();
        router.route("/foo/").unwrap().func(|_| async { "dir" }).unwrap();

        let response = router.dispatch(get("/foo")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_malformed_path() {
        let router = Router::new();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("*")
            .body(Body::empty())
            .unwrap();

        let response = router.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_echo_routes_from_config() {
        let router = Router::from_config(&[
            RouteConfig::new("user", "/users/:id"),
            RouteConfig::new("assets", "/static/*"),
        ])
        .unwrap();

        let json = body_json(router.dispatch(get("/static/a/b")).await).await;
        assert_eq!(
            json,
            serde_json::json!({
                "route": "assets",
                "pattern": "/static/*",
                "path": "/static/a/b",
                "captures": { "*": "a/b" },
            })
        );

        let json = body_json(router.dispatch(get("/users/42")).await).await;
        assert_eq!(json["captures"]["id"], "42");
    }

    #[tokio::test]
    async fn test_dispatch_decodes_escapes() {
        let router = Router::from_config(&[
            RouteConfig::new("user", "/users/:id"),
            RouteConfig::new("assets", "/static/*"),
        ])
        .unwrap();

        let json = body_json(router.dispatch(get("/users/foo%20bar")).await).await;
        assert_eq!(json["captures"]["id"], "foo bar");
        assert_eq!(json["path"], "/users/foo%20bar");

        let json = body_json(router.dispatch(get("/static/a%2Fb%20c")).await).await;
        assert_eq!(json["captures"]["*"], "a/b c");

        // A decoded slash adds a segment, so the variable no longer fits
        let response = router.dispatch(get("/users/a%2Fb")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_invalid_utf8_escape() {
        let router = Router::from_config(&[RouteConfig::new("user", "/users/:id")]).unwrap();

        let response = router.dispatch(get("/users/%FF")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_config_conflict() {
        let errors = Router::from_config(&[
            RouteConfig::new("a", "/x"),
            RouteConfig::new("b", "x"),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].route, "b");
    }
}
