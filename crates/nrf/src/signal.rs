use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// SIGINT and SIGTERM handlers, installed as soon as this is constructed.
pub struct ShutdownSignals {
    sigint: Signal,
    sigterm: Signal,
}

impl ShutdownSignals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the first termination signal.
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.sigint.recv() => info!("received SIGINT, stopping"),
            _ = self.sigterm.recv() => info!("received SIGTERM, stopping"),
        }
    }

    /// Cancel `shutdown` from a background task once a signal arrives.
    pub fn spawn_listener(mut self, shutdown: CancellationToken) {
        tokio::spawn(async move {
            tokio::select! {
                _ = self.recv() => shutdown.cancel(),
                _ = shutdown.cancelled() => {}
            }
        });
    }
}
