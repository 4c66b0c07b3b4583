//! The callback type and identity helpers.
//!
//! Hooks are shared closures invoked with the execution context they were
//! registered with and the call record of the current dispatch. Returning an
//! `Err` aborts the remaining phases of the current call and propagates to
//! the caller of the intercepted method.
//!
//! # Identity
//!
//! Detach matches callbacks by handle identity, so callers that intend to
//! remove a hook later must keep a clone of the [`HookFn`] they attached:
//!
//! ```
//! use tether_registry::callback::{hook, same_hook};
//!
//! let callback = hook(|_ctx, _record| Ok(()));
//! let kept = callback.clone();
//! assert!(same_hook(&callback, &kept));
//! ```

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::error::HookError;
use crate::record::CallRecord;

/// A shared hook callback.
pub type HookFn =
    Arc<dyn Fn(&ExecutionContext, &mut CallRecord) -> Result<(), HookError> + Send + Sync>;

/// Wraps a closure into a [`HookFn`].
pub fn hook<F>(f: F) -> HookFn
where
    F: Fn(&ExecutionContext, &mut CallRecord) -> Result<(), HookError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Returns true if `a` and `b` are clones of the same [`HookFn`].
#[must_use]
pub fn same_hook(a: &HookFn, b: &HookFn) -> bool {
    core::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let a = hook(|_, _| Ok(()));
        let b = a.clone();
        assert!(same_hook(&a, &b));
    }

    #[test]
    fn distinct_hooks_differ() {
        let a = hook(|_, _| Ok(()));
        let b = hook(|_, _| Ok(()));
        assert!(!same_hook(&a, &b));
    }
}
