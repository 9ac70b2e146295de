//! Error types used by the dispatcher.
//!
//! This module defines one error enum:
//!
//! - [`DispatchError`] — errors raised by registration and broadcast.
//!
//! The type provides helper methods (`as_label`, `as_message`) for
//! logging/metrics.
//!
//! Note that removal of an unknown id, name or target is **not** an error
//! anywhere in this crate: every removal operation is a no-op on a missing
//! match, by design, so cleanup code never has to guard its calls.

use thiserror::Error;

/// # Errors produced by the dispatcher.
///
/// These represent misuse of the registration API or a refused broadcast,
/// never an internal failure of the engine itself.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A listener was registered under an empty event name.
    #[error("listener name must not be empty")]
    EmptyName,

    /// Broadcast nesting reached the configured maximum and the call was refused.
    ///
    /// The engine stays fully usable; only this specific `send` is abandoned.
    #[error("recursion limit hit for event '{name}': depth {depth}, max {max}")]
    RecursionLimit {
        /// Name of the event whose broadcast was refused.
        name: String,
        /// Nesting depth at the moment of refusal.
        depth: usize,
        /// Configured maximum depth.
        max: usize,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use signalcast::DispatchError;
    ///
    /// assert_eq!(DispatchError::EmptyName.as_label(), "empty_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::EmptyName => "empty_name",
            DispatchError::RecursionLimit { .. } => "recursion_limit",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::EmptyName => "listener name must not be empty".to_string(),
            DispatchError::RecursionLimit { name, depth, max } => {
                format!("recursion limit for '{name}': depth={depth} max={max}")
            }
        }
    }
}
