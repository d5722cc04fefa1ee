//! Route table reloads against a live server.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::StatusCode;
use route_tree::config::watcher::ConfigWatcher;
use route_tree::http::swap_routers;
use route_tree::Router;
use tokio::time::{sleep, timeout};

mod common;

const VALID: &str = "[[routes]]\nname = \"orders\"\npath = \"/orders/:id\"\n";
const CONFLICTING: &str = "\
[[routes]]
name = \"orders\"
path = \"/orders/:id\"

[[routes]]
name = \"order-items\"
path = \"/orders/:order/items\"
";

fn config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("route-tree-reload-{}-{}.toml", std::process::id(), name))
}

// In place, without truncating first: the watcher must never see an empty
// file in between. Contents only ever grow here.
fn overwrite(path: &Path, contents: &str) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.set_len(contents.len() as u64).unwrap();
}

async fn status(client: &reqwest::Client, url: String) -> StatusCode {
    client.get(url).send().await.unwrap().status()
}

#[tokio::test]
async fn test_reload_swaps_valid_table_and_keeps_it_on_conflict() {
    let path = config_path("swap");
    fs::write(&path, "").unwrap();

    let server = common::start_server(Router::new()).await;
    let client = common::client();

    let (watcher, updates) = ConfigWatcher::new(&path);
    let _watcher = watcher.run().unwrap();
    tokio::spawn(swap_routers(updates, server.router.clone(), server.shutdown.subscribe()));

    assert_eq!(status(&client, server.url("/orders/7")).await, StatusCode::NOT_FOUND);

    overwrite(&path, VALID);
    timeout(Duration::from_secs(5), async {
        while status(&client, server.url("/orders/7")).await != StatusCode::OK {
            sleep(Duration::from_millis(50)).await;
        }
    })
    .await
    .expect("valid table was never swapped in");

    // Let any further events from the same write settle
    sleep(Duration::from_millis(300)).await;
    let before = server.router.load_full();
    overwrite(&path, CONFLICTING);
    sleep(Duration::from_secs(1)).await;

    // The rejected table never reached the handle
    assert!(std::sync::Arc::ptr_eq(&before, &server.router.load_full()));
    assert_eq!(status(&client, server.url("/orders/7")).await, StatusCode::OK);
    assert_eq!(
        status(&client, server.url("/orders/7/items")).await,
        StatusCode::NOT_FOUND
    );

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
    fs::remove_file(&path).unwrap();
}
