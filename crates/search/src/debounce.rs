//! Cancellable delayed execution.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct DebounceState {
    /// Bumped by every `schedule`/`cancel`; a task only runs if it still holds the latest value.
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Runs only the most recently scheduled action, once `interval` has elapsed
/// without another schedule.
///
/// Each `schedule` aborts the pending task and spawns a new one. The generation
/// check covers the window where an aborted task has already woken up.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replace any pending action with `action`, to run after the quiet interval.
    ///
    /// Outside a Tokio runtime there is no timer to wait on, so the action runs
    /// immediately.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            tracing::debug!("no tokio runtime; running debounced action immediately");
            self.cancel();
            action();
            return;
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        let generation = state.generation;
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }

        let shared = Arc::clone(&self.state);
        let interval = self.interval;
        state.pending = Some(handle.spawn(async move {
            tokio::time::sleep(interval).await;
            {
                let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if state.generation != generation {
                    return;
                }
                state.pending = None;
            }
            action();
        }));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
    }

    /// Is an action waiting for its quiet interval to elapse?
    pub fn is_pending(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const QUIET: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn action_runs_after_quiet_interval() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_schedules_run_only_the_last_action() {
        let debouncer = Debouncer::new(QUIET);
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in ["r", "re", "red"] {
            let seen = Arc::clone(&seen);
            debouncer.schedule(move || seen.lock().unwrap().push(value));
            tokio::time::sleep(Duration::from_millis(30)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["red"]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_action() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_quiet_windows_each_run() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&runs);
            debouncer.schedule(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(150)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn without_runtime_action_runs_immediately() {
        let debouncer = Debouncer::new(QUIET);
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        debouncer.schedule(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
