//! Hookable subjects and hook-enablement.
//!
//! A [`Subject`] owns a registration table of named methods. Method names
//! carrying the subject's prefix (default [`DEFAULT_PREFIX`]) are native
//! implementations; [`Subject::enable`] scans the table and exposes each
//! native `___x` behind a public intercepted method `x` that dispatches
//! hooks around the real call. Names without the prefix are plain methods:
//! callable, never intercepted, and never hookable.
//!
//! Enablement is idempotent per method name; re-enabling never double-wraps.
//!
//! # Example
//!
//! ```
//! use tether_intercept::Subject;
//! use serde_json::{Value, json};
//!
//! let cat = Subject::builder("cat")
//!     .method("___walk", |args: &[Value]| args.first().cloned().unwrap_or(Value::Null))
//!     .build();
//!
//! assert_eq!(cat.call("walk", vec![json!("dog")]).unwrap(), json!("dog"));
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use tether_registry::callback::HookFn;
use tether_registry::context::ExecutionContext;
use tether_registry::error::HookError;
use tether_registry::handler::{HandlerEntry, HandlerTable};
use tether_registry::ident::{EntryId, ObserverId, SubjectId};
use tether_registry::listening::{ListenerSet, ListeningRecord};

use crate::dispatch;

/// Default marker distinguishing native method implementations from the
/// public methods exposed around them.
pub const DEFAULT_PREFIX: &str = "___";

/// A native method implementation.
///
/// Natives receive the (possibly hook-mutated) argument list and return the
/// call's result. State lives in whatever the closure captures.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Context state identifying a subject.
///
/// Every handler entry attached to a subject carries the subject's context
/// as its bound fallback; a callback registered without an explicit context
/// through a path that supplies no default can downcast to this.
#[derive(Debug)]
pub struct SubjectContext {
    subject: SubjectId,
}

impl SubjectContext {
    /// The subject this context identifies.
    #[must_use]
    pub fn subject(&self) -> SubjectId {
        self.subject
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Method table
// ─────────────────────────────────────────────────────────────────────────────

/// One slot in the subject's method table.
#[derive(Clone)]
pub(crate) enum Method {
    /// Registered without the prefix: callable directly, never intercepted.
    Plain(NativeFn),
    /// A prefixed native implementation awaiting (or backing) enablement.
    Native(NativeFn),
    /// A public method dispatching hooks around the stored native.
    Intercepted(NativeFn),
}

// ─────────────────────────────────────────────────────────────────────────────
// SubjectCore
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct SubjectCore {
    pub(crate) id: SubjectId,
    pub(crate) name: String,
    pub(crate) prefix: String,
    pub(crate) context: ExecutionContext,
    pub(crate) methods: RwLock<IndexMap<String, Method>>,
    pub(crate) handlers: RwLock<HandlerTable>,
    pub(crate) listeners: Mutex<ListenerSet>,
}

impl SubjectCore {
    /// Ensures an interceptable method named `name` exists.
    ///
    /// Returns true when hooks may be attached under `name`: either the
    /// method is already intercepted, or no method of that name existed and
    /// a no-op native is synthesized under the prefixed key and enabled.
    /// Plain and native methods cannot be hooked and return false.
    pub(crate) fn ensure_hookable(&self, name: &str) -> bool {
        let mut methods = self.methods.write();
        match methods.get(name) {
            Some(Method::Intercepted(_)) => true,
            Some(Method::Plain(_) | Method::Native(_)) => false,
            None => {
                let noop: NativeFn = Arc::new(|_args| Value::Null);
                methods.insert(
                    format!("{}{}", self.prefix, name),
                    Method::Native(noop.clone()),
                );
                methods.insert(name.to_owned(), Method::Intercepted(noop));
                true
            }
        }
    }

    pub(crate) fn push_entry(&self, name: &str, entry: HandlerEntry) {
        self.handlers.write().push(name, entry);
    }

    /// Removes `observer`'s entries matching the given narrowing filters.
    ///
    /// `names` restricts removal to the given event names; a per-name
    /// callback (from the map form) takes precedence over the positional
    /// `callback` filter. Returns the removed entries.
    pub(crate) fn remove_matching(
        &self,
        observer: ObserverId,
        names: Option<&[(String, Option<HookFn>)]>,
        callback: Option<&HookFn>,
        context: Option<&ExecutionContext>,
    ) -> Vec<HandlerEntry> {
        let mut table = self.handlers.write();
        let scoped = |entry: &HandlerEntry, callback: Option<&HookFn>| {
            entry.listening().observer() == observer && entry.matches(callback, context)
        };
        match names {
            None => table.remove_where(|entry| scoped(entry, callback)),
            Some(pairs) => {
                let mut removed = Vec::new();
                for (name, mapped) in pairs {
                    let effective = mapped.as_ref().or(callback);
                    removed.extend(table.remove_in(name, |entry| scoped(entry, effective)));
                }
                removed
            }
        }
    }

    pub(crate) fn remove_entry(&self, name: &str, id: EntryId) -> Option<HandlerEntry> {
        self.handlers.write().remove_entry(name, id)
    }

    pub(crate) fn register_listener(&self, observer: ObserverId, record: Arc<ListeningRecord>) {
        self.listeners.lock().insert(observer, record);
    }

    pub(crate) fn unregister_listener(&self, observer: ObserverId) {
        self.listeners.lock().remove(observer);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subject
// ─────────────────────────────────────────────────────────────────────────────

/// A hookable object: a registry of named methods plus the handler and
/// listener tables hooks are dispatched from.
///
/// Cheap to clone; clones share the same subject. Handlers that need to
/// re-enter the subject capture a clone.
#[derive(Clone)]
pub struct Subject {
    core: Arc<SubjectCore>,
}

impl Subject {
    /// Starts building a subject with the given debug name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SubjectBuilder {
        SubjectBuilder {
            name: name.into(),
            prefix: DEFAULT_PREFIX.to_owned(),
            methods: IndexMap::new(),
        }
    }

    /// The subject's unique id.
    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.core.id
    }

    /// The subject's debug name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.core.name
    }

    /// The native-method prefix this subject was built with.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.core.prefix
    }

    /// The subject's own context (the bound fallback of its handler entries).
    #[must_use]
    pub fn context(&self) -> &ExecutionContext {
        &self.core.context
    }

    /// Registers a method after construction.
    ///
    /// Names carrying the prefix are stored as natives and are exposed by
    /// the next [`enable`](Self::enable); other names become plain methods.
    /// An already-enabled public method keeps the implementation it was
    /// wrapped around.
    pub fn define_method<F>(&self, name: impl Into<String>, f: F) -> &Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        let method = if name.starts_with(&self.core.prefix) {
            Method::Native(Arc::new(f))
        } else {
            Method::Plain(Arc::new(f))
        };
        self.core.methods.write().insert(name, method);
        self
    }

    /// Scans the method table and exposes every native `___x` behind a
    /// public intercepted method `x`.
    ///
    /// Idempotent: already-intercepted names are left untouched, so
    /// re-enabling never double-wraps. A plain method shadowed by a native
    /// of the same public name is replaced by the intercepted one.
    pub fn enable(&self) -> &Self {
        let mut methods = self.core.methods.write();
        let prefix = &self.core.prefix;
        let natives: Vec<(String, NativeFn)> = methods
            .iter()
            .filter_map(|(key, method)| match method {
                Method::Native(f) if key.starts_with(prefix.as_str()) => {
                    let public = key[prefix.len()..].to_owned();
                    (!public.is_empty()).then(|| (public, f.clone()))
                }
                _ => None,
            })
            .collect();
        for (public, native) in natives {
            if !matches!(methods.get(&public), Some(Method::Intercepted(_))) {
                methods.insert(public, Method::Intercepted(native));
            }
        }
        self
    }

    /// Invokes a method by name.
    ///
    /// Intercepted methods dispatch their hook phases around the native
    /// call and return the (possibly rewritten) call-record result; plain
    /// and native methods are invoked directly.
    ///
    /// # Errors
    ///
    /// [`HookError::UnknownMethod`] if no method of that name exists; any
    /// error a hook returned, aborting the remaining phases.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value, HookError> {
        let method = self.core.methods.read().get(name).cloned();
        match method {
            Some(Method::Plain(f) | Method::Native(f)) => Ok(f(&args)),
            Some(Method::Intercepted(native)) => {
                dispatch::run_intercepted(&self.core, name, &native, args)
            }
            None => Err(HookError::UnknownMethod(name.to_owned())),
        }
    }

    /// Returns true if `name` is a public intercepted method.
    #[must_use]
    pub fn is_hookable(&self, name: &str) -> bool {
        matches!(
            self.core.methods.read().get(name),
            Some(Method::Intercepted(_))
        )
    }

    /// Returns true if a method of any kind exists under `name`.
    #[must_use]
    pub fn contains_method(&self, name: &str) -> bool {
        self.core.methods.read().contains_key(name)
    }

    /// Returns every registered method name, in definition order.
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        self.core.methods.read().keys().cloned().collect()
    }

    /// Returns the number of hooks currently attached under `event`.
    #[must_use]
    pub fn hook_count(&self, event: &str) -> usize {
        self.core.handlers.read().count(event)
    }

    /// Returns the number of observers currently listening to this subject.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.core.listeners.lock().len()
    }

    pub(crate) fn core_arc(&self) -> &Arc<SubjectCore> {
        &self.core
    }
}

impl core::fmt::Debug for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subject")
            .field("id", &self.core.id)
            .field("name", &self.core.name)
            .field("methods", &self.method_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SubjectBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for [`Subject`].
pub struct SubjectBuilder {
    name: String,
    prefix: String,
    methods: IndexMap<String, NativeFn>,
}

impl SubjectBuilder {
    /// Overrides the native-method prefix (default [`DEFAULT_PREFIX`]).
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Registers a method. Names carrying the prefix are natives, exposed
    /// behind an intercepted public method by [`build`](Self::build).
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Builds the subject and enables its prefixed natives.
    #[must_use]
    pub fn build(self) -> Subject {
        let id = SubjectId::next();
        let methods = self
            .methods
            .into_iter()
            .map(|(name, f)| {
                let method = if name.starts_with(&self.prefix) {
                    Method::Native(f)
                } else {
                    Method::Plain(f)
                };
                (name, method)
            })
            .collect();
        let subject = Subject {
            core: Arc::new(SubjectCore {
                id,
                name: self.name,
                prefix: self.prefix,
                context: ExecutionContext::new(SubjectContext { subject: id }),
                methods: RwLock::new(methods),
                handlers: RwLock::new(HandlerTable::new()),
                listeners: Mutex::new(ListenerSet::new()),
            }),
        };
        subject.enable();
        subject
    }
}
