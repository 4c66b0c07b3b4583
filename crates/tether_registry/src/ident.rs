//! Identity types for subjects, observers, and handler entries.
//!
//! Every subject, observer, and handler entry is minted a process-unique id
//! from a monotonic counter. Ids are the keys of the cross-reference tables:
//! the listening index is keyed by [`SubjectId`], the listener set by
//! [`ObserverId`], and a once-shim unregisters exactly its own entry via
//! [`EntryId`].

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $display:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Mints the next unique id.
            #[must_use]
            pub fn next() -> Self {
                static COUNTER: AtomicU64 = AtomicU64::new(0);
                Self(COUNTER.fetch_add(1, Ordering::Relaxed))
            }

            /// Returns the raw id value.
            #[must_use]
            pub fn index(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $display, self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a hookable subject.
    SubjectId,
    "subject_{}"
);

define_id!(
    /// Unique identifier for an observer.
    ObserverId,
    "observer_{}"
);

define_id!(
    /// Unique identifier for a single handler entry.
    EntryId,
    "entry_{}"
);
