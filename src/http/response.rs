//! Response construction.
//!
//! # Responsibilities
//! - Map routing outcomes to HTTP status codes
//! - Render the echo body served by configured routes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::routing::{Captures, RouteError};

/// Body returned by routes declared in the configuration file.
#[derive(Debug, Clone, Serialize)]
pub struct Echo {
    /// Configured route name.
    pub route: String,
    /// Configured path pattern.
    pub pattern: String,
    /// Request path as received.
    pub path: String,
    pub captures: Captures,
}

impl IntoResponse for Echo {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Lookup miss.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

/// Request path the router cannot interpret.
pub fn bad_request(error: &RouteError) -> Response {
    (StatusCode::BAD_REQUEST, error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);

        let error = RouteError::MalformedPath { path: "*".into() };
        assert_eq!(bad_request(&error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_echo_is_json() {
        let response = Echo {
            route: "r".into(),
            pattern: "/".into(),
            path: "/".into(),
            captures: Captures::new(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
