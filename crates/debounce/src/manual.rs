//! Virtual-clock scheduler
//!
//! Time only moves when the owner calls `advance` or `run_until_idle`.
//! Due tasks run on the caller's thread, one at a time, in deadline order
//! (insertion order for equal deadlines). This is the single-threaded
//! cooperative model: a task never runs concurrently with other code.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::scheduler::{Scheduler, Task};

/// Handle to a task queued on a `ManualScheduler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManualHandle(u64);

#[derive(Default)]
struct ManualState {
    /// Current virtual time
    now: Duration,
    /// Sequence number for the next scheduled task
    next_seq: u64,
    /// Pending tasks keyed by (deadline, sequence)
    queue: BTreeMap<(Duration, u64), Task>,
}

/// Scheduler with a manually driven clock
///
/// Cloning yields another handle to the same clock and queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of queued tasks
    pub fn pending_tasks(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Move the clock forward by `by`, running every task that becomes due
    ///
    /// Tasks scheduled by running tasks are picked up in the same pass if
    /// their deadline falls inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;

        while let Some(task) = self.pop_due(target) {
            task();
        }

        let mut state = self.state.lock();
        if state.now < target {
            state.now = target;
        }
    }

    /// Move the clock to `at` (no-op if already past it)
    pub fn advance_to(&self, at: Duration) {
        let now = self.now();
        if at > now {
            self.advance(at - now);
        }
    }

    /// Run queued tasks until the queue is empty, moving the clock to each
    /// task's deadline
    pub fn run_until_idle(&self) {
        loop {
            let task = {
                let mut state = self.state.lock();
                let Some(((deadline, _), task)) = state.queue.pop_first() else {
                    break;
                };
                state.now = state.now.max(deadline);
                task
            };
            task();
        }
    }

    /// Pop the earliest task whose deadline is at or before `target`
    ///
    /// The lock is released before the task runs so it may schedule more.
    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut state = self.state.lock();
        let (&(deadline, _), _) = state.queue.first_key_value()?;
        if deadline > target {
            return None;
        }
        let ((deadline, seq), task) = state.queue.pop_first()?;
        state.now = state.now.max(deadline);
        trace!(?deadline, seq, "running manual task");
        Some(task)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: Task) -> ManualHandle {
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let deadline = state.now + delay;
        state.queue.insert((deadline, seq), task);
        ManualHandle(seq)
    }

    fn cancel(&self, handle: ManualHandle) {
        self.state.lock().queue.retain(|&(_, seq), _| seq != handle.0);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("queued", &state.queue.len())
            .finish()
    }
}
