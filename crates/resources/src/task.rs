//! Handles for background tasks that poll the pool

use banker_errors::Error;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A spawned background loop that can be asked to stop.
#[derive(Debug)]
pub struct BackgroundTask<T> {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<Result<T, Error>>,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Spawn `body` with a receiver that flips to `true` on shutdown.
    pub(crate) fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(body(rx));
        Self { shutdown, handle }
    }

    /// Whether the loop has already ended on its own
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the loop to stop and wait for its result.
    ///
    /// # Errors
    ///
    /// Returns whatever error ended the loop, or an internal error if the
    /// task panicked or was aborted.
    pub async fn stop(self) -> Result<T, Error> {
        // The receiver is gone if the loop already ended; its result is
        // still waiting in the handle.
        let _ = self.shutdown.send(true);
        self.join().await
    }

    /// Wait for the loop to end on its own.
    ///
    /// # Errors
    ///
    /// Same as [`BackgroundTask::stop`].
    pub async fn join(self) -> Result<T, Error> {
        self.handle
            .await
            .map_err(|e| Error::internal(format!("background task failed: {e}")))?
    }
}
