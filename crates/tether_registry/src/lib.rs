//! The foundational registry primitives for Tether (Layer 1).
//!
//! `tether_registry` provides the data structures the interception engine is
//! built from:
//!
//! - [`ident`] - Identity types for subjects, observers, and handler entries
//! - [`context`] - Type-erased execution contexts for callback invocation
//! - [`events`] - Event-name resolution (single, space-separated, map forms)
//! - [`record`] - The per-call record shared by every hook in a dispatch
//! - [`callback`] - The callback type and identity helpers
//! - [`handler`] - Handler entries and the per-subject handler table
//! - [`listening`] - Reference-counted observer/subject listening records
//! - [`error`] - Error type shared across the workspace
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Tether architecture:
//!
//! - **Layer 1** (`tether_registry`): registry primitives (this crate)
//! - **Layer 2** (`tether_intercept`): subjects, observers, and the
//!   method-interception dispatch engine

/// The callback type and identity helpers.
pub mod callback;

/// Type-erased execution contexts.
pub mod context;

/// Error type shared across the workspace.
pub mod error;

/// Event-name resolution.
pub mod events;

/// Handler entries and the handler table.
pub mod handler;

/// Identity types.
pub mod ident;

/// Reference-counted listening records and indexes.
pub mod listening;

/// The per-call record.
pub mod record;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::callback::{HookFn, hook, same_hook};
    pub use crate::context::{ContextState, ExecutionContext};
    pub use crate::error::HookError;
    pub use crate::events::EventNames;
    pub use crate::handler::{HandlerEntry, HandlerTable};
    pub use crate::ident::{EntryId, ObserverId, SubjectId};
    pub use crate::listening::{ListenerSet, ListeningIndex, ListeningRecord};
    pub use crate::record::{CallRecord, Value};
}
