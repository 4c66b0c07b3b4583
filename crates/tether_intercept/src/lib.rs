//! Method interception and hook dispatch for Tether (Layer 2).
//!
//! `tether_intercept` turns the registry primitives of `tether_registry`
//! into the observer/subject hook system:
//!
//! - [`Subject`] - a hookable object: a registry of named methods where
//!   prefixed natives are exposed behind an interception wrapper
//! - [`Observer`] - attaches callbacks to subject methods and tears them
//!   down again, in bulk or with cumulative narrowing
//! - [`Phase`] - the dispatch points around an intercepted call
//!
//! # Dispatch model
//!
//! Calling an intercepted method runs `before` hooks, the native method,
//! `now` hooks, and `after` hooks, each phase followed by its `all`-variant
//! tap, all against one shared [`CallRecord`](tether_registry::record::CallRecord).
//! Handler lists are snapshotted when a phase begins: a hook attached during
//! a phase never runs within that phase, and a hook removed mid-phase still
//! finishes the current snapshot. No lock is held while a callback or the
//! native method runs, so hooks may attach, detach, and re-enter freely.
//!
//! # Example
//!
//! ```
//! use tether_intercept::{Observer, Subject};
//! use tether_registry::callback::hook;
//! use serde_json::{Value, json};
//!
//! let counter = Subject::builder("counter")
//!     .method("___incr", |args: &[Value]| {
//!         json!(args.first().and_then(Value::as_i64).unwrap_or(0) + 1)
//!     })
//!     .build();
//!
//! let observer = Observer::new();
//! observer.add_hook(
//!     Some(&counter),
//!     "incr",
//!     Some(hook(|_ctx, record| {
//!         // Rewrite the result after the native call ran.
//!         record.return_value = json!(100);
//!         Ok(())
//!     })),
//!     None,
//! );
//!
//! assert_eq!(counter.call("incr", vec![json!(1)]).unwrap(), json!(100));
//! ```

mod dispatch;

/// Observer API: attach, detach, once.
pub mod observer;

/// Dispatch phases around an intercepted call.
pub mod phase;

/// Hookable subjects and hook-enablement.
pub mod subject;

pub use observer::{Observer, ObserverContext};
pub use phase::Phase;
pub use subject::{DEFAULT_PREFIX, NativeFn, Subject, SubjectBuilder, SubjectContext};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::observer::{Observer, ObserverContext};
    pub use crate::phase::Phase;
    pub use crate::subject::{DEFAULT_PREFIX, NativeFn, Subject, SubjectBuilder, SubjectContext};
    pub use tether_registry::prelude::*;
}
