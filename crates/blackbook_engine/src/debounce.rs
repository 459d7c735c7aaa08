use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Quiet-period scheduler where the newest schedule supersedes any pending one.
///
/// A job runs only if no newer job was scheduled before its quiet period
/// ended. Jobs already running are never interrupted.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    latest: Arc<AtomicU64>,
    shutdown: CancellationToken,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            latest: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Schedule `job`. The returned handle resolves to whether it ran.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, job: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = self.latest.clone();
        let shutdown = self.shutdown.clone();
        let quiet = self.quiet;

        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => return false,
                _ = tokio::time::sleep(quiet) => {}
            }
            if latest.load(Ordering::SeqCst) != ticket {
                return false;
            }
            job().await;
            true
        })
    }

    /// Drop every pending job. Running jobs finish.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
