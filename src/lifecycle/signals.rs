//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM
//! - Translate the first one into a graceful shutdown
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGTERM is only available on Unix; elsewhere Ctrl+C alone is used

use crate::lifecycle::shutdown::Shutdown;

/// Block until a termination signal arrives, then trigger `shutdown`.
pub async fn wait_for_signal(shutdown: &Shutdown) -> std::io::Result<()> {
    terminated().await?;
    tracing::info!("Termination signal received");
    shutdown.trigger();
    Ok(())
}

#[cfg(unix)]
async fn terminated() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = sigterm.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn terminated() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
