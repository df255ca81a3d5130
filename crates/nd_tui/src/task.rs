use std::future::Future;

use futures_util::FutureExt;
use tokio::task::JoinHandle;

/// A spawned background task that is aborted when its handle drops.
/// Views hold one per in-flight fetch; leaving the view drops the
/// handle, so a late result can never touch state the view no longer
/// owns.
pub struct TaskHandle<T> {
    join: JoinHandle<T>,
}

impl<T: Send + 'static> TaskHandle<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            join: tokio::spawn(future),
        }
    }

    /// Non-blocking completion check. `Some` means the task finished
    /// and the handle must be dropped, not polled again; the inner
    /// value is `None` when the task was aborted.
    pub fn try_finish(&mut self) -> Option<Option<T>> {
        match (&mut self.join).now_or_never() {
            Some(Ok(value)) => Some(Some(value)),
            Some(Err(_)) => Some(None),
            None => None,
        }
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        self.join.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle<T: Send + 'static>(handle: &mut TaskHandle<T>) -> Option<Option<T>> {
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if let Some(outcome) = handle.try_finish() {
                return Some(outcome);
            }
        }
        None
    }

    #[tokio::test]
    async fn test_completed_task_yields_value() {
        let mut handle = TaskHandle::spawn(async { 7 });
        let outcome = settle(&mut handle).await.expect("task should finish");
        assert_eq!(outcome, Some(7));
    }

    #[tokio::test]
    async fn test_aborted_task_yields_nothing() {
        let mut handle = TaskHandle::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            7
        });
        handle.join.abort();
        let outcome = settle(&mut handle).await.expect("abort should settle");
        assert_eq!(outcome, None);
    }
}
