//! Handler entries and the per-subject handler table.
//!
//! The table maps an event name to the ordered list of entries attached
//! under it. Insertion order is dispatch order. Dispatch never iterates the
//! live lists; it takes a shallow snapshot per phase and iterates that, so
//! mutations made by running hooks affect only later calls.
//!
//! Names whose list becomes empty after a removal are deleted from the
//! table, never kept as empty lists.

use std::sync::Arc;

use hashbrown::HashMap;

use crate::callback::{HookFn, same_hook};
use crate::context::ExecutionContext;
use crate::ident::EntryId;
use crate::listening::ListeningRecord;

// ─────────────────────────────────────────────────────────────────────────────
// HandlerEntry
// ─────────────────────────────────────────────────────────────────────────────

/// One registered hook: callback, invocation target, context, and the
/// listening record it is counted against.
///
/// `callback` carries the identity used by detach matching and is always the
/// callback the caller supplied; `invoke` is what dispatch actually calls
/// (a once-shim, or `callback` itself for plain registrations). Keeping the
/// original identity on the entry is what lets a once registration be
/// removed by its original callback before it ever fires.
#[derive(Clone)]
pub struct HandlerEntry {
    id: EntryId,
    callback: HookFn,
    invoke: HookFn,
    context: Option<ExecutionContext>,
    bound: ExecutionContext,
    listening: Arc<ListeningRecord>,
}

impl HandlerEntry {
    /// Creates an entry whose invocation target is the callback itself.
    #[must_use]
    pub fn new(
        id: EntryId,
        callback: HookFn,
        context: Option<ExecutionContext>,
        bound: ExecutionContext,
        listening: Arc<ListeningRecord>,
    ) -> Self {
        let invoke = callback.clone();
        Self {
            id,
            callback,
            invoke,
            context,
            bound,
            listening,
        }
    }

    /// Creates an entry that dispatches through a shim while keeping the
    /// original callback's identity for matching.
    #[must_use]
    pub fn with_shim(
        id: EntryId,
        callback: HookFn,
        shim: HookFn,
        context: Option<ExecutionContext>,
        bound: ExecutionContext,
        listening: Arc<ListeningRecord>,
    ) -> Self {
        Self {
            id,
            callback,
            invoke: shim,
            context,
            bound,
            listening,
        }
    }

    /// The entry's unique id.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// The callback dispatch invokes.
    #[must_use]
    pub fn invoke(&self) -> &HookFn {
        &self.invoke
    }

    /// The listening record this entry is counted against.
    #[must_use]
    pub fn listening(&self) -> &Arc<ListeningRecord> {
        &self.listening
    }

    /// The context the entry's callback runs against: the registered context
    /// when one was given, the bound fallback otherwise.
    #[must_use]
    pub fn effective_context(&self) -> &ExecutionContext {
        self.context.as_ref().unwrap_or(&self.bound)
    }

    /// Returns true if the entry matches the given narrowing filters.
    ///
    /// An absent filter matches everything. A `callback` filter matches the
    /// entry's original callback or its installed shim; a `context` filter
    /// matches by handle identity against the registered context.
    #[must_use]
    pub fn matches(&self, callback: Option<&HookFn>, context: Option<&ExecutionContext>) -> bool {
        let callback_matches = callback.is_none_or(|candidate| {
            same_hook(candidate, &self.callback) || same_hook(candidate, &self.invoke)
        });
        let context_matches = context.is_none_or(|candidate| {
            self.context
                .as_ref()
                .is_some_and(|registered| registered.same_as(candidate))
        });
        callback_matches && context_matches
    }
}

impl core::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("id", &self.id)
            .field("listening", &self.listening)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HandlerTable
// ─────────────────────────────────────────────────────────────────────────────

/// Per-subject map from event name to the ordered list of handler entries.
#[derive(Debug, Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Vec<HandlerEntry>>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry under `name`, preserving registration order.
    pub fn push(&mut self, name: impl Into<String>, entry: HandlerEntry) {
        self.handlers.entry(name.into()).or_default().push(entry);
    }

    /// Returns a shallow copy of the list under `name`, if any.
    #[must_use]
    pub fn snapshot(&self, name: &str) -> Option<Vec<HandlerEntry>> {
        self.handlers.get(name).cloned()
    }

    /// Returns the number of entries under `name`.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.handlers.get(name).map_or(0, Vec::len)
    }

    /// Returns every event name with at least one entry.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Returns true if the table holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Removes every entry under `name` matching `pred`, returning the
    /// removed entries in their registration order. Deletes the key if the
    /// list becomes empty.
    pub fn remove_in(
        &mut self,
        name: &str,
        pred: impl Fn(&HandlerEntry) -> bool,
    ) -> Vec<HandlerEntry> {
        let Some(list) = self.handlers.get_mut(name) else {
            return Vec::new();
        };
        let mut removed = Vec::new();
        list.retain(|entry| {
            if pred(entry) {
                removed.push(entry.clone());
                false
            } else {
                true
            }
        });
        if list.is_empty() {
            self.handlers.remove(name);
        }
        removed
    }

    /// Removes matching entries under every event name.
    pub fn remove_where(&mut self, pred: impl Fn(&HandlerEntry) -> bool) -> Vec<HandlerEntry> {
        let names = self.names();
        let mut removed = Vec::new();
        for name in names {
            removed.extend(self.remove_in(&name, &pred));
        }
        removed
    }

    /// Removes the single entry with the given id under `name`.
    pub fn remove_entry(&mut self, name: &str, id: EntryId) -> Option<HandlerEntry> {
        self.remove_in(name, |entry| entry.id() == id).pop()
    }
}
