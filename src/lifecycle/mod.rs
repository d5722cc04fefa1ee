//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → drains in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Startup is fail-fast: any configuration error aborts before binding
//! - Config reload is driven by the file watcher, not by SIGHUP

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
