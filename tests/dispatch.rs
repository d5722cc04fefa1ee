//! End-to-end dispatch through a live server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use route_tree::config::RouteConfig;
use route_tree::{Captures, Router};
use serde_json::Value;

mod common;

async fn index(_request: Request<Body>) -> &'static str {
    "index"
}

#[tokio::test]
async fn test_code_registered_routes() {
    let hits = Arc::new(AtomicU32::new(0));

    let mut router = Router::new();
    router.route("/").unwrap().func(index).unwrap();

    let users = router.route("/users").unwrap();
    let counter = hits.clone();
    users
        .route(":username")
        .unwrap()
        .route("greet")
        .unwrap()
        .func_e(move |_request, env: Captures| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { format!("hello {}", env.get("username").unwrap_or_default()) }
        })
        .unwrap();

    router
        .route("/static/*")
        .unwrap()
        .func_e(|request: Request<Body>, env: Captures| async move {
            format!("{} -> {}", request.uri().path(), env.wildcard().unwrap_or_default())
        })
        .unwrap();

    let server = common::start_server(router).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "index");

    let res = client.get(server.url("/users/foobar/greet")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "hello foobar");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let res = client.get(server.url("/static/css/site.css")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "/static/css/site.css -> css/site.css");

    // Directory-like node without a handler, and a variable that cannot be empty
    for path in ["/users", "/users//greet", "/static", "/nope"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_echo_table_over_http() {
    let router = Router::from_config(&[
        RouteConfig::new("item", "/foo/:id"),
        RouteConfig::new("edit", "/foo/:id/edit"),
        RouteConfig::new("dir", "/foo/"),
    ])
    .unwrap();
    let server = common::start_server(router).await;
    let client = common::client();

    let res = client.get(server.url("/foo/bar?q=1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["route"], "item");
    assert_eq!(body["captures"]["id"], "bar");

    let body: Value = client
        .get(server.url("/foo/bar/edit"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["route"], "edit");

    let body: Value = client.get(server.url("/foo/")).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["route"], "dir");
    assert_eq!(body["captures"], serde_json::json!({}));

    for path in ["/foo", "/foo/bar/xyz"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_concurrent_requests() {
    let router = Router::from_config(&[RouteConfig::new("user", "/users/:id")]).unwrap();
    let server = common::start_server(router).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = server.url(&format!("/users/{i}"));
        tasks.push(tokio::spawn(async move {
            let body: Value = client.get(url).send().await.unwrap().json().await.unwrap();
            assert_eq!(body["captures"]["id"], i.to_string());
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}
