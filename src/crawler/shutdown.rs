//! Soft and hard shutdown signals
//!
//! The soft signal stops task acquisition and lets running tree walkers
//! drain. The hard signal terminates the process without waiting.

use tokio_util::sync::CancellationToken;

/// Exit status used for a forced shutdown
pub const FORCED_EXIT_CODE: i32 = 1;

/// Pair of independent cancellation signals
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    soft: CancellationToken,
    hard: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token cancelled on a graceful shutdown request
    pub fn soft(&self) -> CancellationToken {
        self.soft.clone()
    }

    /// Token cancelled on a forced shutdown request
    pub fn hard(&self) -> CancellationToken {
        self.hard.clone()
    }

    pub fn trigger_soft(&self) {
        self.soft.cancel();
    }

    pub fn trigger_hard(&self) {
        self.hard.cancel();
    }

    /// First Ctrl-C requests a graceful shutdown, the second forces one
    pub async fn listen_for_interrupts(self) {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Unable to listen for interrupt signals");
            return;
        }
        tracing::info!(">>> Shutting down crawler... <<<");
        self.trigger_soft();

        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!(">>> Force shutdown! <<<");
        self.trigger_hard();
    }

    /// Terminates the process once the hard signal fires
    pub async fn exit_on_hard_shutdown(self) {
        self.hard.cancelled().await;
        std::process::exit(FORCED_EXIT_CODE);
    }
}

/// Sleeps for `duration` unless `token` is cancelled first
///
/// Returns `false` if the sleep was interrupted.
pub async fn sleep_or_cancel(duration: std::time::Duration, token: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = token.cancelled() => false,
    }
}
