//! Dispatch phases around an intercepted call.
//!
//! A call to an intercepted method walks a linear state machine:
//! `before` → native call → `now` → `after`, each phase followed by its
//! `all`-variant tap. Phases gain meaning purely from the event names they
//! dispatch; from the registry's point of view `before:x` is an ordinary
//! name like any other.

/// Prefix applied to event names registered through the before-phase sugar.
pub const BEFORE_PREFIX: &str = "before:";

/// Prefix applied to event names registered through the after-phase sugar.
pub const AFTER_PREFIX: &str = "after:";

/// One dispatch point around an intercepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Runs before the native call.
    Before,
    /// Runs directly after the native call (the method's own event name).
    Now,
    /// Runs after the `now` phase.
    After,
}

impl Phase {
    /// The phases in dispatch order.
    pub const ORDER: [Phase; 3] = [Phase::Before, Phase::Now, Phase::After];

    /// Returns the qualified event name this phase dispatches for `method`.
    #[must_use]
    pub fn event_name(&self, method: &str) -> String {
        match self {
            Phase::Before => format!("{BEFORE_PREFIX}{method}"),
            Phase::Now => method.to_owned(),
            Phase::After => format!("{AFTER_PREFIX}{method}"),
        }
    }

    /// Returns the name of this phase's `all`-variant tap.
    #[must_use]
    pub fn all_name(&self) -> &'static str {
        match self {
            Phase::Before => "before:all",
            Phase::Now => "all",
            Phase::After => "after:all",
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Phase::Before => "before",
            Phase::Now => "now",
            Phase::After => "after",
        };
        write!(f, "{label}")
    }
}
