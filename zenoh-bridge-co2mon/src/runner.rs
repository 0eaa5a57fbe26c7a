//! Background task bookkeeping for shutdown.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Wait for a background task and report how it ended.
///
/// Returns `true` if the task panicked. Cancellation is the normal way the
/// poller stops, so it is only logged at debug level.
pub async fn join_task(name: &str, handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => false,
        Err(e) if e.is_panic() => {
            warn!(task = name, error = %e, "Background task panicked");
            true
        }
        Err(e) => {
            debug!(task = name, error = %e, "Background task cancelled");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let handle: JoinHandle<()> = tokio::spawn(async { panic!("publisher blew up") });
        assert!(join_task("publisher", handle).await);
    }

    #[tokio::test]
    async fn test_finished_and_aborted_tasks_are_not_panics() {
        let done = tokio::spawn(async {});
        assert!(!join_task("publisher", done).await);

        let pending = tokio::spawn(std::future::pending::<()>());
        pending.abort();
        assert!(!join_task("poller", pending).await);
    }
}
