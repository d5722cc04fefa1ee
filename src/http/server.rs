//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that funnels every request into the routing tree
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Bind server to listener and drain on shutdown
//! - Swap in a rebuilt router without dropping in-flight requests

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    response::Response,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::routing::Router;

/// Shared, atomically replaceable router.
pub type RouterHandle = Arc<ArcSwap<Router>>;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: RouterHandle,
}

/// HTTP front end for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    router: RouterHandle,
}

impl HttpServer {
    /// Create a new HTTP server serving `router` with the given configuration.
    pub fn new(config: &RouterConfig, router: Router) -> Self {
        let router: RouterHandle = Arc::new(ArcSwap::from_pointee(router));
        let state = AppState {
            router: router.clone(),
        };
        let app = Self::build_app(config, state);
        Self { app, router }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        axum::Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// Handle for replacing the router while the server runs.
    pub fn router_handle(&self) -> RouterHandle {
        self.router.clone()
    }

    /// The Axum app, for in-process testing.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Store each router received on `updates` into `router`, until shutdown
/// or until the sending side goes away. Requests already dispatched keep
/// the router they loaded.
pub async fn swap_routers(
    mut updates: mpsc::UnboundedReceiver<Router>,
    router: RouterHandle,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => break,
            update = updates.recv() => {
                let Some(next) = update else { break };
                router.store(Arc::new(next));
                tracing::info!("Routing table swapped");
            }
        }
    }
}

/// Route every request through the current routing tree.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let router = state.router.load_full();
    router.dispatch(request).await
}
