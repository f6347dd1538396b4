//! Scheduling capability used by the debouncer
//!
//! The debouncer never owns a timer facility itself. It is handed a
//! `Scheduler` which can run a task after a delay and cancel it again.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::error::DebounceError;

/// A unit of deferred work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Host timer facility: "schedule callback after duration" and "cancel"
pub trait Scheduler: Send + Sync + 'static {
    /// Cancellable handle to one scheduled task
    type Handle: Send + 'static;

    /// Run `task` once after `delay` has elapsed
    ///
    /// Must never run the task synchronously, even for a zero delay.
    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;

    /// Cancel a scheduled task. A cancelled task never runs.
    fn cancel(&self, handle: Self::Handle);
}

/// Scheduler backed by a Tokio runtime
///
/// Each scheduled task is a spawned Tokio task that sleeps for the delay
/// and then runs. Cancelling aborts the spawned task.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Use the runtime of the calling context
    pub fn current() -> Result<Self, DebounceError> {
        let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;
        Ok(Self { runtime })
    }

    /// Use an explicit runtime handle
    pub fn with_handle(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = AbortHandle;

    fn schedule(&self, delay: Duration, task: Task) -> AbortHandle {
        self.runtime
            .spawn(async move {
                tokio::time::sleep(delay).await;
                task();
            })
            .abort_handle()
    }

    fn cancel(&self, handle: AbortHandle) {
        handle.abort();
    }
}
