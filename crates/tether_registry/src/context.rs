//! Type-erased execution contexts for callback invocation.
//!
//! The original dynamic-dispatch design rebound the callee (`this`) per
//! invocation; here the context is an explicit, shareable handle threaded
//! through dispatch. A callback receives the [`ExecutionContext`] it was
//! registered with (the observer's own context unless one was supplied at
//! attach time) and can downcast it to a concrete state type.
//!
//! # Identity
//!
//! Contexts compare by handle identity, not by value. Detach narrowing by
//! context ("remove everything I registered with context X") uses
//! [`ExecutionContext::same_as`], which is true only for clones of the same
//! handle.
//!
//! # Example
//!
//! ```
//! use tether_registry::context::ExecutionContext;
//!
//! struct Session { user: String }
//!
//! let ctx = ExecutionContext::new(Session { user: "ada".into() });
//! assert_eq!(ctx.downcast_ref::<Session>().unwrap().user, "ada");
//! assert!(ctx.same_as(&ctx.clone()));
//! ```

use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};

/// State a callback can be invoked against.
///
/// Any `Send + Sync + 'static` type qualifies; the trait exists so contexts
/// can be stored type-erased and recovered by downcast.
pub trait ContextState: DowncastSync {}
impl_downcast!(sync ContextState);

// Blanket implementation for all compatible types.
impl<T: Send + Sync + 'static> ContextState for T {}

/// Shared, type-erased execution context handle.
///
/// Cheap to clone; clones share identity. The interception engine never
/// inspects the contents, it only carries the handle to the callback.
#[derive(Clone)]
pub struct ExecutionContext {
    state: Arc<dyn ContextState>,
}

impl ExecutionContext {
    /// Wraps a state value into a context handle.
    #[must_use]
    pub fn new(state: impl ContextState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Returns a reference to the state if it is of type `T`.
    #[must_use]
    pub fn downcast_ref<T: ContextState>(&self) -> Option<&T> {
        self.state.as_ref().downcast_ref::<T>()
    }

    /// Returns true if `self` and `other` are clones of the same handle.
    #[must_use]
    pub fn same_as(&self, other: &ExecutionContext) -> bool {
        core::ptr::eq(
            Arc::as_ptr(&self.state).cast::<()>(),
            Arc::as_ptr(&other.state).cast::<()>(),
        )
    }
}

impl core::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("state", &Arc::as_ptr(&self.state))
            .finish()
    }
}
