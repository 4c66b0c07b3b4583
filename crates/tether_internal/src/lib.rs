//! # Tether Internal Library
//!
//! Re-exports the core Tether crates for convenience.

/// Layer 1: registry primitives.
pub use tether_registry;

/// Layer 2: method interception and hook dispatch.
pub use tether_intercept;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use tether_intercept::prelude::*;
}
