//! Debounced invocation for Parley
//!
//! This crate provides:
//! - `Debouncer`: coalesces a burst of calls into one delayed action call
//! - `Scheduler`: the injected "run later / cancel" capability
//! - `TokioScheduler` and `ManualScheduler` implementations

pub mod debouncer;
pub mod error;
pub mod manual;
pub mod scheduler;

// Re-exports
pub use debouncer::{wait_from_millis, wait_from_secs_f64, Debouncer};
pub use error::DebounceError;
pub use manual::{ManualHandle, ManualScheduler};
pub use scheduler::{Scheduler, Task, TokioScheduler};
