//! Event-name resolution.
//!
//! Public attach/detach entry points accept event names in three forms:
//! a single name, a whitespace-separated list of names, or a map from name
//! to callback. The forms are a tagged variant resolved exactly once at the
//! API boundary; the rest of the engine only ever sees individual
//! `(name, callback)` pairs.
//!
//! Map keys may themselves be whitespace-separated ("a b c" mapping three
//! names to one callback) and expand per key.
//!
//! # Example
//!
//! ```
//! use tether_registry::events::EventNames;
//!
//! let names = EventNames::from("change blur");
//! assert_eq!(
//!     names.resolve(None).into_iter().map(|(n, _)| n).collect::<Vec<_>>(),
//!     vec!["change".to_string(), "blur".to_string()],
//! );
//! ```

use crate::callback::HookFn;

/// Event names supplied to an attach or detach call, resolved once at the
/// public entry point.
#[derive(Clone)]
pub enum EventNames {
    /// One event name.
    Single(String),
    /// Several event names (the whitespace-separated form, pre-split).
    List(Vec<String>),
    /// Name-to-callback pairs (the map form).
    Map(Vec<(String, HookFn)>),
}

impl EventNames {
    /// Parses a name specification, splitting on runs of whitespace.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let mut names = spec.split_whitespace().map(str::to_owned);
        match (names.next(), names.next()) {
            (Some(first), None) => Self::Single(first),
            (Some(first), Some(second)) => {
                let mut list = vec![first, second];
                list.extend(names);
                Self::List(list)
            }
            (None, _) => Self::List(Vec::new()),
        }
    }

    /// Returns true for the map form, which carries its own callbacks.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Resolves into individual `(name, callback)` pairs.
    ///
    /// Single and list forms pair every name with `fallback`; the map form
    /// ignores `fallback` and expands any whitespace-separated keys, pairing
    /// each resulting name with the key's callback.
    #[must_use]
    pub fn resolve(&self, fallback: Option<&HookFn>) -> Vec<(String, Option<HookFn>)> {
        match self {
            Self::Single(name) => vec![(name.clone(), fallback.cloned())],
            Self::List(names) => names
                .iter()
                .map(|name| (name.clone(), fallback.cloned()))
                .collect(),
            Self::Map(pairs) => pairs
                .iter()
                .flat_map(|(key, callback)| {
                    key.split_whitespace()
                        .map(|name| (name.to_owned(), Some(callback.clone())))
                })
                .collect(),
        }
    }
}

impl From<&str> for EventNames {
    fn from(spec: &str) -> Self {
        Self::parse(spec)
    }
}

impl From<String> for EventNames {
    fn from(spec: String) -> Self {
        Self::parse(&spec)
    }
}

impl From<Vec<String>> for EventNames {
    fn from(names: Vec<String>) -> Self {
        Self::List(names)
    }
}

impl From<Vec<(String, HookFn)>> for EventNames {
    fn from(pairs: Vec<(String, HookFn)>) -> Self {
        Self::Map(pairs)
    }
}

impl<const N: usize> From<[(&str, HookFn); N]> for EventNames {
    fn from(pairs: [(&str, HookFn); N]) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(name, callback)| (name.to_owned(), callback))
                .collect(),
        )
    }
}

impl core::fmt::Debug for EventNames {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Single(name) => f.debug_tuple("Single").field(name).finish(),
            Self::List(names) => f.debug_tuple("List").field(names).finish(),
            Self::Map(pairs) => {
                let keys: Vec<&str> = pairs.iter().map(|(name, _)| name.as_str()).collect();
                f.debug_tuple("Map").field(&keys).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{hook, same_hook};

    fn names_of(events: &EventNames) -> Vec<String> {
        events.resolve(None).into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn single_name() {
        let events = EventNames::from("change");
        assert!(matches!(events, EventNames::Single(_)));
        assert_eq!(names_of(&events), vec!["change"]);
    }

    #[test]
    fn splits_on_runs_of_whitespace() {
        let events = EventNames::from("change \t blur  focus");
        assert_eq!(names_of(&events), vec!["change", "blur", "focus"]);
    }

    #[test]
    fn single_and_list_carry_the_fallback() {
        let callback = hook(|_, _| Ok(()));
        let pairs = EventNames::from("a b").resolve(Some(&callback));
        assert_eq!(pairs.len(), 2);
        for (_, resolved) in &pairs {
            assert!(same_hook(resolved.as_ref().unwrap(), &callback));
        }
    }

    #[test]
    fn map_form_ignores_the_fallback() {
        let mapped = hook(|_, _| Ok(()));
        let fallback = hook(|_, _| Ok(()));
        let events = EventNames::from([("a", mapped.clone())]);
        let pairs = events.resolve(Some(&fallback));
        assert_eq!(pairs.len(), 1);
        assert!(same_hook(pairs[0].1.as_ref().unwrap(), &mapped));
    }

    #[test]
    fn map_keys_expand_on_whitespace() {
        let callback = hook(|_, _| Ok(()));
        let events = EventNames::from([("a b c", callback)]);
        assert_eq!(names_of(&events), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_spec_resolves_to_nothing() {
        assert!(EventNames::from("  ").resolve(None).is_empty());
    }
}
