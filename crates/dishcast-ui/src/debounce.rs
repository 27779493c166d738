//! Debounce guard for search-as-you-type.
//!
//! Each call cancels the not-yet-fired schedule and starts a new quiet
//! period. Only the last call inside a window runs, with its own arguments.
//! A fire that has already started is left alone: the action runs on its own
//! task, so a later call cannot cut it short.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

type BoxedAction<A> = Arc<dyn Fn(A) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct Debouncer<A> {
    delay: Duration,
    action: BoxedAction<A>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            delay,
            action: Arc::new(
                move |args: A| -> Pin<Box<dyn Future<Output = ()> + Send>> {
                    Box::pin(action(args))
                },
            ),
            pending: Mutex::new(None),
        }
    }

    /// Schedule the action with `args`, replacing any pending schedule.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn call(&self, args: A) {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let action = self.action.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action(args));
        }));
    }

    /// Whether a fire is scheduled and has not happened yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Drop the pending schedule, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, Debouncer<u32>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let debouncer = Debouncer::new(Duration::from_millis(500), move |n: u32| {
            let sink = sink.clone();
            async move {
                sink.lock().push(n);
            }
        });
        (calls, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_args() {
        let (calls, debouncer) = recorder();

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call(3);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*calls.lock(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_quiet_period() {
        let (calls, debouncer) = recorder();

        debouncer.call(7);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(calls.lock().is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*calls.lock(), vec![7]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_fire_separately() {
        let (calls, debouncer) = recorder();

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(*calls.lock(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_fire() {
        let (calls, debouncer) = recorder();

        debouncer.call(1);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_pending_fire() {
        let (calls, debouncer) = recorder();

        debouncer.call(1);
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(calls.lock().is_empty());
    }
}
