//! Signal handling for graceful shutdown

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, warn};

/// Handles shutdown signals (SIGTERM, SIGINT)
pub struct ShutdownSignal;

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        Self
    }

    /// Wait for a shutdown signal.
    ///
    /// If a handler cannot be registered, that signal is never observed;
    /// the other still is.
    pub async fn wait(&self) {
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| warn!(?e, "failed to register SIGTERM handler"))
            .ok();
        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| warn!(?e, "failed to register SIGINT handler"))
            .ok();

        tokio::select! {
            Some(_) = recv(&mut sigterm) => {
                debug!("received SIGTERM");
            }
            Some(_) = recv(&mut sigint) => {
                debug!("received SIGINT");
            }
            else => std::future::pending::<()>().await,
        }
    }
}

async fn recv(signal: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match signal {
        Some(signal) => signal.recv().await,
        None => std::future::pending().await,
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}
