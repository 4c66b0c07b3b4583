//! Error type shared across the workspace.

use thiserror::Error;

/// Errors surfaced by subject calls and hook dispatch.
///
/// There is no centralized error channel: an `Err` returned by a hook aborts
/// the remaining phases of the current call and propagates synchronously to
/// the caller of the intercepted method.
#[derive(Debug, Error)]
pub enum HookError {
    /// The subject has no method under the requested name.
    #[error("no method named '{0}' on this subject")]
    UnknownMethod(String),

    /// A hook callback failed.
    #[error("{0}")]
    Failure(String),
}

impl HookError {
    /// Creates a [`Failure`](Self::Failure) from a message.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure(msg.into())
    }
}
