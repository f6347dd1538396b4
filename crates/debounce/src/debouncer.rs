//! Debounced invoker
//!
//! Every `invoke` cancels the outstanding timer (if any), records the new
//! arguments and schedules a fresh timer `wait` from now. When a timer
//! fires uncancelled the action runs once with the last recorded
//! arguments. A burst of calls closer together than `wait` therefore
//! produces exactly one action call, `wait` after the last one.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::DebounceError;
use crate::scheduler::{Scheduler, TokioScheduler};

type Action<A> = Box<dyn Fn(A) + Send + Sync + 'static>;

/// Outstanding timer plus the generation it was scheduled for
struct Pending<H> {
    handle: H,
    generation: u64,
}

struct State<A, H> {
    /// At most one outstanding timer
    pending: Option<Pending<H>>,
    /// Arguments of the most recent call
    args: Option<A>,
    /// Bumped on every invoke and cancel; a firing timer must match it
    generation: u64,
}

struct Inner<A, S: Scheduler> {
    action: Action<A>,
    wait: Duration,
    scheduler: S,
    state: Mutex<State<A, S::Handle>>,
}

impl<A, S: Scheduler> Inner<A, S> {
    /// Timer callback
    ///
    /// A timer whose cancellation raced with its deadline carries a stale
    /// generation and does nothing.
    fn fire(&self, generation: u64) {
        let args = {
            let mut state = self.state.lock();
            match &state.pending {
                Some(pending) if pending.generation == generation => {}
                _ => {
                    trace!(generation, "stale debounce timer ignored");
                    return;
                }
            }
            state.pending = None;
            state.args.take()
        };

        // Lock is released here so the action may call invoke again.
        if let Some(args) = args {
            debug!(generation, "debounce timer fired");
            (self.action)(args);
        }
    }
}

impl<A, S: Scheduler> Drop for Inner<A, S> {
    fn drop(&mut self) {
        if let Some(pending) = self.state.get_mut().pending.take() {
            trace!("abandoning pending debounce timer");
            self.scheduler.cancel(pending.handle);
        }
    }
}

/// Coalesces rapid calls into a single delayed call of an action
///
/// Clones share the same pending timer and recorded arguments. Once every
/// clone is dropped, an outstanding timer is abandoned and never fires.
pub struct Debouncer<A, S: Scheduler = TokioScheduler> {
    inner: Arc<Inner<A, S>>,
}

impl<A: Send + 'static> Debouncer<A, TokioScheduler> {
    /// Create a debouncer that schedules on the current Tokio runtime
    pub fn new<F>(action: F, wait: Duration) -> Result<Self, DebounceError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Ok(Self::with_scheduler(action, wait, TokioScheduler::current()?))
    }
}

impl<A: Send + 'static, S: Scheduler> Debouncer<A, S> {
    /// Create a debouncer on an explicit scheduler
    pub fn with_scheduler<F>(action: F, wait: Duration, scheduler: S) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                action: Box::new(action),
                wait,
                scheduler,
                state: Mutex::new(State {
                    pending: None,
                    args: None,
                    generation: 0,
                }),
            }),
        }
    }

    /// Trigger the action, restarting the quiet period
    ///
    /// Never blocks and never runs the action synchronously.
    pub fn invoke(&self, args: A) {
        let mut state = self.inner.state.lock();

        if let Some(previous) = state.pending.take() {
            trace!(generation = previous.generation, "cancelling debounce timer");
            self.inner.scheduler.cancel(previous.handle);
        }

        state.args = Some(args);
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let weak: Weak<Inner<A, S>> = Arc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            self.inner.wait,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.fire(generation);
                }
            }),
        );

        state.pending = Some(Pending { handle, generation });
        trace!(generation, wait = ?self.inner.wait, "debounce timer scheduled");
    }

    /// Drop the pending timer and recorded arguments without calling the action
    pub fn cancel(&self) {
        let mut state = self.inner.state.lock();
        state.args = None;
        state.generation = state.generation.wrapping_add(1);
        if let Some(pending) = state.pending.take() {
            debug!(generation = pending.generation, "debounce cancelled");
            self.inner.scheduler.cancel(pending.handle);
        }
    }

    /// Whether a timer is outstanding
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }

    /// Configured quiet period
    pub fn wait(&self) -> Duration {
        self.inner.wait
    }
}

impl<A, S: Scheduler> Clone for Debouncer<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S: Scheduler> std::fmt::Debug for Debouncer<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.inner.wait)
            .finish_non_exhaustive()
    }
}

/// Convert a wait given in (possibly negative) milliseconds
pub fn wait_from_millis(millis: i64) -> Result<Duration, DebounceError> {
    let millis = u64::try_from(millis).map_err(|_| {
        DebounceError::InvalidArgument(format!("wait must be non-negative, got {millis}ms"))
    })?;
    Ok(Duration::from_millis(millis))
}

/// Convert a wait given in fractional seconds
pub fn wait_from_secs_f64(secs: f64) -> Result<Duration, DebounceError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        DebounceError::InvalidArgument(format!(
            "wait must be a finite non-negative number of seconds, got {secs}"
        ))
    })
}
