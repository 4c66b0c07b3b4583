//! A method-hook library for Rust: observers attach callbacks to subject
//! methods, and an interception wrapper dispatches them around every call.

pub use tether_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use tether_internal::prelude::*;
}
