//! Hot reload of the route table.
//!
//! # Data Flow
//! ```text
//! file modified / created
//!     → load_config (parse + validate, route conflicts included)
//!     → Router::from_config
//!     → compiled Router sent to the swap task
//!
//! Any failure is logged and nothing is sent: the running router stays.
//! ```

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::validation::ValidationError;
use crate::routing::Router;

/// Watches one config file and compiles a fresh [`Router`] on every change.
pub struct ConfigWatcher {
    path: PathBuf,
    routers: mpsc::UnboundedSender<Router>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for compiled routers.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Router>) {
        let (routers, updates) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            routers,
        };
        (watcher, updates)
    }

    /// Start watching. Changes stop being picked up once the returned
    /// handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, routers } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match compile_file(&watched) {
                        Ok(router) => {
                            tracing::info!(path = ?watched, "Route table recompiled");
                            let _ = routers.send(router);
                        }
                        Err(e) => {
                            tracing::error!(path = ?watched, error = %e, "Rejected config change, keeping current routes");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?path, "Watching route table");
        Ok(watcher)
    }
}

/// Load, validate and compile the route table stored at `path`.
pub fn compile_file(path: &Path) -> Result<Router, ConfigError> {
    let config = load_config(path)?;
    Router::from_config(&config.routes).map_err(|errors| {
        ConfigError::Validation(errors.into_iter().map(ValidationError::Route).collect())
    })
}
