//! Observer API: attach, detach, once.
//!
//! An [`Observer`] registers callbacks against subject methods and owns the
//! listening index that makes "unhook everything I ever attached" an
//! O(listening-pairs) operation. Attach and detach return `&Self` so calls
//! chain.
//!
//! # Event-name forms
//!
//! Every attach/detach entry point accepts the three
//! [`EventNames`](tether_registry::events::EventNames) forms: a single
//! name, a whitespace-separated list, or a name→callback map. The forms are
//! resolved once at the entry point.
//!
//! # Context defaulting
//!
//! An explicit context wins. With the map form, a callback supplied in the
//! callback position acts as the context when none was given (the map
//! already carries the callbacks). Otherwise callbacks run against the
//! observer's own context.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use tether_registry::callback::{HookFn, hook};
use tether_registry::context::ExecutionContext;
use tether_registry::events::EventNames;
use tether_registry::handler::HandlerEntry;
use tether_registry::ident::{EntryId, ObserverId, SubjectId};
use tether_registry::listening::ListeningIndex;

use crate::phase::{AFTER_PREFIX, BEFORE_PREFIX};
use crate::subject::{Subject, SubjectCore};

/// Context state identifying an observer; the default context callbacks run
/// against when none is supplied at attach time.
#[derive(Debug)]
pub struct ObserverContext {
    observer: ObserverId,
}

impl ObserverContext {
    /// The observer this context identifies.
    #[must_use]
    pub fn observer(&self) -> ObserverId {
        self.observer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ObserverCore
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct ObserverCore {
    id: ObserverId,
    context: ExecutionContext,
    listening: Mutex<ListeningIndex<Weak<SubjectCore>>>,
}

impl ObserverCore {
    /// Removes exactly one handler entry, settling the listening record.
    /// This is the once-shim's self-unregistration path.
    fn detach_entry(&self, subject: &SubjectCore, name: &str, id: EntryId) {
        if let Some(entry) = subject.remove_entry(name, id) {
            if entry.listening().decrement() == 0 {
                subject.unregister_listener(self.id);
                self.listening.lock().remove(subject.id);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer
// ─────────────────────────────────────────────────────────────────────────────

/// Registers callbacks against subjects and tears them down again.
///
/// Cheap to clone; clones share the same observer identity and listening
/// index.
#[derive(Clone)]
pub struct Observer {
    core: Arc<ObserverCore>,
}

impl Observer {
    /// Creates an observer whose default context is its own
    /// [`ObserverContext`].
    #[must_use]
    pub fn new() -> Self {
        let id = ObserverId::next();
        Self::with_context(ExecutionContext::new(ObserverContext { observer: id }), id)
    }

    /// Creates an observer with a custom default context.
    #[must_use]
    pub fn with_default_context(context: ExecutionContext) -> Self {
        Self::with_context(context, ObserverId::next())
    }

    fn with_context(context: ExecutionContext, id: ObserverId) -> Self {
        Self {
            core: Arc::new(ObserverCore {
                id,
                context,
                listening: Mutex::new(ListeningIndex::new()),
            }),
        }
    }

    /// The observer's unique id.
    #[must_use]
    pub fn id(&self) -> ObserverId {
        self.core.id
    }

    /// The observer's default context.
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.core.context
    }

    /// Returns the number of subjects this observer currently listens to.
    #[must_use]
    pub fn listening_count(&self) -> usize {
        self.core.listening.lock().len()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attach
    // ─────────────────────────────────────────────────────────────────────

    /// Attaches `callback` to the given events on `subject`.
    ///
    /// A `None` subject, and any resolved name without a callback, is a
    /// silent no-op. Attaching to a method name the subject does not have
    /// synthesizes a hookable no-op method of that name; attaching to a
    /// plain (unprefixed) method is skipped.
    pub fn add_hook(
        &self,
        subject: Option<&Subject>,
        events: impl Into<EventNames>,
        callback: Option<HookFn>,
        context: Option<ExecutionContext>,
    ) -> &Self {
        self.add_hook_with(subject, events, callback, context, AttachMode::Every)
    }

    /// Like [`add_hook`](Self::add_hook), prefixing every resolved name
    /// with `before:` so the hooks run before the native call.
    pub fn add_hook_before(
        &self,
        subject: Option<&Subject>,
        events: impl Into<EventNames>,
        callback: Option<HookFn>,
        context: Option<ExecutionContext>,
    ) -> &Self {
        self.add_hook_with(subject, events, callback, context, AttachMode::Before)
    }

    /// Like [`add_hook`](Self::add_hook), prefixing every resolved name
    /// with `after:` so the hooks run after the `now` phase.
    pub fn add_hook_after(
        &self,
        subject: Option<&Subject>,
        events: impl Into<EventNames>,
        callback: Option<HookFn>,
        context: Option<ExecutionContext>,
    ) -> &Self {
        self.add_hook_with(subject, events, callback, context, AttachMode::After)
    }

    /// Attaches hooks that fire at most once per registration.
    ///
    /// Each resolved (name, callback) gets its own self-unregistering shim;
    /// the entry keeps the original callback's identity, so it can still be
    /// detached by that callback before it ever fires.
    pub fn add_hook_once(
        &self,
        subject: Option<&Subject>,
        events: impl Into<EventNames>,
        callback: Option<HookFn>,
        context: Option<ExecutionContext>,
    ) -> &Self {
        self.add_hook_with(subject, events, callback, context, AttachMode::Once)
    }

    fn add_hook_with(
        &self,
        subject: Option<&Subject>,
        events: impl Into<EventNames>,
        callback: Option<HookFn>,
        context: Option<ExecutionContext>,
        mode: AttachMode,
    ) -> &Self {
        let Some(subject) = subject else {
            return self;
        };
        let events = events.into();
        let context = self.resolve_context(&events, callback.as_ref(), context);
        for (name, callback) in events.resolve(callback.as_ref()) {
            let Some(callback) = callback else {
                continue;
            };
            let name = match mode {
                AttachMode::Before => format!("{BEFORE_PREFIX}{name}"),
                AttachMode::After => format!("{AFTER_PREFIX}{name}"),
                AttachMode::Every | AttachMode::Once => name,
            };
            self.attach(subject, &name, callback, context.clone(), mode);
        }
        self
    }

    /// Resolves the context per the module-level defaulting rules.
    fn resolve_context(
        &self,
        events: &EventNames,
        callback: Option<&HookFn>,
        context: Option<ExecutionContext>,
    ) -> ExecutionContext {
        if let Some(context) = context {
            return context;
        }
        if events.is_map() {
            if let Some(callback) = callback {
                return ExecutionContext::new(callback.clone());
            }
        }
        self.core.context.clone()
    }

    /// Appends one handler entry under `name`, cross-registering the
    /// listening record on both sides.
    fn attach(
        &self,
        subject: &Subject,
        name: &str,
        callback: HookFn,
        context: ExecutionContext,
        mode: AttachMode,
    ) {
        if !subject.core_arc().ensure_hookable(name) {
            tracing::debug!(
                observer = %self.core.id,
                subject = %subject.id(),
                event = name,
                "attach skipped: method exists but is not hookable"
            );
            return;
        }

        let record = {
            let mut listening = self.core.listening.lock();
            listening
                .get_or_insert_with(self.core.id, subject.id(), || {
                    Arc::downgrade(subject.core_arc())
                })
                .record
                .clone()
        };
        record.increment();
        subject.core_arc().register_listener(self.core.id, record.clone());

        let id = EntryId::next();
        let bound = subject.context().clone();
        let entry = if matches!(mode, AttachMode::Once) {
            let shim = self.once_shim(subject, name, id, &callback);
            HandlerEntry::with_shim(id, callback, shim, Some(context), bound, record)
        } else {
            HandlerEntry::new(id, callback, Some(context), bound, record)
        };
        subject.core_arc().push_entry(name, entry);
        tracing::debug!(
            observer = %self.core.id,
            subject = %subject.id(),
            event = name,
            once = matches!(mode, AttachMode::Once),
            "hook attached"
        );
    }

    /// Builds the self-unregistering wrapper for a once registration.
    fn once_shim(
        &self,
        subject: &Subject,
        name: &str,
        id: EntryId,
        original: &HookFn,
    ) -> HookFn {
        let observer = Arc::downgrade(&self.core);
        let subject = Arc::downgrade(subject.core_arc());
        let name = name.to_owned();
        let original = original.clone();
        let fired = AtomicBool::new(false);
        hook(move |ctx, record| {
            if fired.swap(true, Ordering::SeqCst) {
                return Ok(());
            }
            if let (Some(observer), Some(subject)) = (observer.upgrade(), subject.upgrade()) {
                observer.detach_entry(&subject, &name, id);
            }
            original(ctx, record)
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Detach
    // ─────────────────────────────────────────────────────────────────────

    /// Removes this observer's hooks, narrowed cumulatively by the given
    /// filters.
    ///
    /// - All `None`: every hook the observer has anywhere, enumerated via
    ///   the listening index, which is then empty.
    /// - `subject`: only hooks on that subject.
    /// - `events`: only the resolved names (single/space-separated/map
    ///   forms; a map's per-name callback narrows that name).
    /// - `callback`: only entries whose original callback (or installed
    ///   shim) is that handle.
    /// - `context`: only entries registered with that context handle.
    ///
    /// Filters compose with a `None` subject too, applying across every
    /// listening pair. Removing nothing is a no-op, never an error.
    pub fn remove_hook(
        &self,
        subject: Option<&Subject>,
        events: Option<EventNames>,
        callback: Option<&HookFn>,
        context: Option<&ExecutionContext>,
    ) -> &Self {
        let pairs = events.as_ref().map(|events| events.resolve(None));
        let targets: Vec<(SubjectId, Weak<SubjectCore>)> = {
            let listening = self.core.listening.lock();
            match subject {
                Some(subject) => listening
                    .get(subject.id())
                    .map(|entry| vec![(subject.id(), entry.target.clone())])
                    .unwrap_or_default(),
                None => listening
                    .subjects()
                    .into_iter()
                    .filter_map(|id| listening.get(id).map(|entry| (id, entry.target.clone())))
                    .collect(),
            }
        };

        for (subject_id, weak) in targets {
            let Some(subject_core) = weak.upgrade() else {
                // The subject is gone; its handler table died with it.
                self.core.listening.lock().remove(subject_id);
                continue;
            };
            let removed = subject_core.remove_matching(
                self.core.id,
                pairs.as_deref(),
                callback,
                context,
            );
            if removed.is_empty() {
                continue;
            }
            for entry in &removed {
                entry.listening().decrement();
            }
            if removed[0].listening().count() == 0 {
                subject_core.unregister_listener(self.core.id);
                self.core.listening.lock().remove(subject_id);
            }
            tracing::debug!(
                observer = %self.core.id,
                subject = %subject_id,
                removed = removed.len(),
                "hooks detached"
            );
        }
        self
    }
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Observer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Observer")
            .field("id", &self.core.id)
            .field("listening", &self.listening_count())
            .finish()
    }
}

/// How an attach entry point routes its resolved names.
#[derive(Clone, Copy)]
enum AttachMode {
    /// Plain registration under the resolved names.
    Every,
    /// Names prefixed with `before:`.
    Before,
    /// Names prefixed with `after:`.
    After,
    /// Plain names, each entry wrapped in a once-shim.
    Once,
}
