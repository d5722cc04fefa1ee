//! HTTP handlers stored in the routing tree.
//!
//! # Responsibilities
//! - Type-erase async request handlers behind a cheap-to-clone [`Handler`]
//! - Provide `func` / `func_e` registration on tree nodes
//!
//! # Design Decisions
//! - Handlers receive the original request untouched plus the [`Captures`]
//! - A plain handler (`func`) simply ignores the captures

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};

use super::captures::Captures;
use super::error::RouteError;
use super::tree::Node;

/// Future returned by a [`Handler`].
pub type HandlerFuture = BoxFuture<'static, Response>;

type HandlerFn = dyn Fn(Request<Body>, Captures) -> HandlerFuture + Send + Sync;

/// A type-erased async request handler.
#[derive(Clone)]
pub struct Handler {
    name: &'static str,
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap a handler that takes the request and the captured path values.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request<Body>, Captures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        Self::named(type_name::<F>(), f)
    }

    fn named<F, Fut, R>(name: &'static str, f: F) -> Self
    where
        F: Fn(Request<Body>, Captures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let inner = move |request: Request<Body>, captures: Captures| -> HandlerFuture {
            let fut = f(request, captures);
            async move { fut.await.into_response() }.boxed()
        };
        Self {
            name,
            inner: Arc::new(inner),
        }
    }

    /// Type name of the wrapped function, shown in route dumps.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn call(&self, request: Request<Body>, captures: Captures) -> HandlerFuture {
        (self.inner)(request, captures)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Node<Handler> {
    /// Register a handler that also receives the captured path values.
    pub fn func_e<F, Fut, R>(&mut self, f: F) -> Result<(), RouteError>
    where
        F: Fn(Request<Body>, Captures) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.set_handler(Handler::new(f))
    }

    /// Register a plain request handler at this node.
    pub fn func<F, Fut, R>(&mut self, f: F) -> Result<(), RouteError>
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let handler = Handler::named(type_name::<F>(), move |request, _captures| f(request));
        self.set_handler(handler)
    }
}
