//! Debounce error types

use thiserror::Error;

/// Errors raised while constructing a debouncer
#[derive(Debug, Error, PartialEq)]
pub enum DebounceError {
    /// Wait duration was negative or not a finite number
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The Tokio scheduler was requested outside of a Tokio runtime
    #[error("no Tokio runtime available to schedule timers")]
    NoRuntime,
}
