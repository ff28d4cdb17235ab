//! Graceful shutdown coordination
//!
//! A [`ShutdownController`] owns a `CancellationToken`. Servers receive the
//! token and stop accepting work once it is cancelled.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Coordinates graceful shutdown across components.
///
/// # Example
///
/// ```ignore
/// let shutdown = ShutdownController::with_signals();
///
/// server.run(shutdown.token()).await?;
/// ```
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a controller that is cancelled on Ctrl+C, or SIGTERM on unix.
    ///
    /// Spawns a background task, so it must be called inside a tokio runtime.
    pub fn with_signals() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            wait_for_signal().await;
            token.cancel();
        });

        controller
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controller_is_not_cancelled() {
        let controller = ShutdownController::new();
        assert!(!controller.token().is_cancelled());
    }

    #[test]
    fn test_tokens_share_cancellation() {
        let controller = ShutdownController::new();
        let first = controller.token();
        let second = controller.clone().token();

        first.cancel();

        assert!(second.is_cancelled());
        assert!(controller.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_with_signals_starts_uncancelled() {
        let controller = ShutdownController::with_signals();
        assert!(!controller.token().is_cancelled());
    }
}
