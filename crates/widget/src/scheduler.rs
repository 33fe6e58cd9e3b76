//! Fire-and-forget timers for cosmetic effects.
//!
//! The counter bump and the toast fade are scheduled here. Tasks cannot be
//! cancelled and may overlap; they only ever touch presentation.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A deferred piece of work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks after a delay.
pub trait Scheduler: Send + Sync {
    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task);
}

/// Schedules tasks on the current tokio runtime.
///
/// Outside a runtime the task is dropped: a missed cosmetic effect is
/// acceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    task();
                });
            }
            Err(e) => {
                tracing::debug!(?delay, error = %e, "No runtime; dropping scheduled task");
            }
        }
    }
}

/// Scheduler driven by a virtual clock.
///
/// Nothing runs until [`advance`](Self::advance) moves the clock past a
/// task's deadline.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

impl ManualScheduler {
    /// A scheduler at time zero with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward by `by`, running every task that falls due in
    /// deadline order. Tasks scheduled by running tasks are honored if they
    /// fall due within the same window. Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now.saturating_add(by);
        let mut ran = 0;

        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }

        self.lock().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut state = self.lock();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = state.pending.swap_remove(index);
        state.now = pending.due;
        Some(pending.task)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now.saturating_add(delay);
        state.pending.push(Pending { due, seq, task });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |label: &'static str| -> Task {
            let sink = Arc::clone(&sink);
            Box::new(move || sink.lock().unwrap().push(label))
        };
        (log, make)
    }

    #[test]
    fn test_runs_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(Duration::from_millis(300), task("late"));
        scheduler.schedule(Duration::from_millis(10), task("early"));
        scheduler.schedule(Duration::from_millis(10), task("early-second"));

        assert_eq!(scheduler.advance(Duration::from_millis(5)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(5)), 2);
        assert_eq!(*log.lock().unwrap(), ["early", "early-second"]);

        assert_eq!(scheduler.advance(Duration::from_secs(1)), 1);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.now(), Duration::from_millis(1010));
    }

    #[test]
    fn test_nested_tasks_run_within_window() {
        let scheduler = Arc::new(ManualScheduler::new());
        let count = Arc::new(AtomicUsize::new(0));

        let inner_scheduler = Arc::clone(&scheduler);
        let inner_count = Arc::clone(&count);
        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                inner_count.fetch_add(1, Ordering::SeqCst);
                let again = Arc::clone(&inner_count);
                inner_scheduler.schedule(
                    Duration::from_millis(100),
                    Box::new(move || {
                        again.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        assert_eq!(scheduler.advance(Duration::from_millis(150)), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(50)), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_runs_after_delay() {
        let count = Arc::new(AtomicUsize::new(0));
        let task_count = Arc::clone(&count);

        TokioScheduler.schedule(
            Duration::from_millis(300),
            Box::new(move || {
                task_count.fetch_add(1, Ordering::SeqCst);
            }),
        );

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_tokio_scheduler_without_runtime_drops_task() {
        TokioScheduler.schedule(Duration::ZERO, Box::new(|| panic!("must not run")));
    }
}
