//! The per-call record shared by every hook in a dispatch.

pub use serde_json::Value;

use crate::ident::SubjectId;

/// Data carrier for one invocation of an intercepted method.
///
/// A `CallRecord` is created fresh when an intercepted method is called and
/// passed by mutable reference to every hook dispatched for that call, so a
/// mutation made by one hook is visible to every later hook in the chain and
/// to the native method itself (which consumes `args` after the before
/// phase).
///
/// # Fields and their contract
///
/// - `args` is the argument list, mutable in place. During an `all`-variant
///   tap the qualified event name is prepended as the first element for the
///   duration of that tap.
/// - `return_value` initially holds the native call's result; any later hook
///   may overwrite it, and the intercepted method returns whatever the slot
///   holds after the final phase.
/// - `replace`, when set by a before-phase hook, makes the engine skip the
///   native call and keep the hook-written `return_value`.
///
/// The record is discarded when the call returns; the engine never retains
/// it.
#[derive(Debug)]
pub struct CallRecord {
    /// Arguments the intercepted method was called with.
    pub args: Vec<Value>,
    /// Identity of the subject owning the intercepted method.
    pub subject: SubjectId,
    /// Name of the intercepted method.
    pub method_name: String,
    /// Result slot, readable and writable by every hook in the chain.
    pub return_value: Value,
    /// When set before the native call, the native call is skipped.
    pub replace: bool,
}

impl CallRecord {
    /// Creates a record for one invocation of `method_name` on `subject`.
    #[must_use]
    pub fn new(subject: SubjectId, method_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            args,
            subject,
            method_name: method_name.into(),
            return_value: Value::Null,
            replace: false,
        }
    }
}
