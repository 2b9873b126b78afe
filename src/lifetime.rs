// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cancellable lifetime shared by the subscription and the host process
//!
//! Either side may end it: the process on a termination signal, the stream
//! consumer when the feed fails. Cancellation is sticky.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// A cloneable cancellation signal
#[derive(Debug, Clone)]
pub struct Lifetime {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Lifetime {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// End the lifetime for every clone
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the lifetime has been cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // `self` keeps the sender alive, so waiting cannot fail.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait up to `grace` for a task to finish
///
/// Returns `None` once the grace period runs out; the task is aborted then
/// and does not outlive the caller.
pub async fn join_within<T>(task: JoinHandle<T>, grace: Duration) -> Option<Result<T, JoinError>> {
    let abort = task.abort_handle();
    match tokio::time::timeout(grace, task).await {
        Ok(joined) => Some(joined),
        Err(_) => {
            abort.abort();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_reaches_clones() {
        let lifetime = Lifetime::new();
        let clone = lifetime.clone();
        assert!(!clone.is_cancelled());

        let waiter = tokio::spawn(async move { clone.cancelled().await });
        lifetime.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(lifetime.is_cancelled());
    }

    #[tokio::test]
    async fn test_join_within_returns_task_output() {
        let task = tokio::spawn(async { 7 });
        let joined = join_within(task, Duration::from_secs(1)).await;
        assert_eq!(joined.map(|r| r.unwrap()), Some(7));
    }

    #[tokio::test]
    async fn test_join_within_aborts_overdue_task() {
        let (_hold, mut released) = watch::channel(());
        let task = tokio::spawn(async move {
            // Never resolves while `_hold` is alive
            let _ = released.changed().await;
        });
        let abort = task.abort_handle();

        assert!(join_within(task, Duration::from_millis(20)).await.is_none());

        tokio::time::timeout(Duration::from_secs(1), async {
            while !abort.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("overdue task should be aborted");
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_cancelled() {
        let lifetime = Lifetime::new();
        lifetime.cancel();
        lifetime.cancel();

        tokio::time::timeout(Duration::from_millis(100), lifetime.cancelled())
            .await
            .expect("already cancelled");
    }
}
