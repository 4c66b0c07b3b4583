//! The interception wrapper's trigger loop.
//!
//! One call to an intercepted method walks `before` → native call → `now` →
//! `after` against a single [`CallRecord`]. When a phase begins, the handler
//! lists for the phase's exact event name and its `all` tap are both
//! snapshotted; the snapshots are then iterated without any lock held, so
//! callbacks may attach, detach, and re-enter the subject freely. A handler
//! added during a phase runs from the next snapshot onward; a handler
//! removed mid-phase still finishes the current snapshot.

use serde_json::Value;

use tether_registry::error::HookError;
use tether_registry::handler::HandlerEntry;
use tether_registry::record::CallRecord;

use crate::phase::Phase;
use crate::subject::{NativeFn, SubjectCore};

/// Runs the full phase machine for one call of an intercepted method.
pub(crate) fn run_intercepted(
    subject: &SubjectCore,
    method: &str,
    native: &NativeFn,
    args: Vec<Value>,
) -> Result<Value, HookError> {
    let mut record = CallRecord::new(subject.id, method, args);

    run_phase(subject, Phase::Before, method, &mut record)?;

    if record.replace {
        tracing::trace!(subject = %subject.id, method, "native call replaced by hook result");
    } else {
        record.return_value = native(&record.args);
    }

    run_phase(subject, Phase::Now, method, &mut record)?;
    run_phase(subject, Phase::After, method, &mut record)?;

    Ok(core::mem::take(&mut record.return_value))
}

/// Dispatches one phase: the exact event name, then the `all`-variant tap.
///
/// Both lists are snapshotted together at the moment the phase begins. The
/// `all` tap receives the qualified event name prepended to the record's
/// argument list for the duration of the tap, so a wildcard handler can
/// tell which event fired.
fn run_phase(
    subject: &SubjectCore,
    phase: Phase,
    method: &str,
    record: &mut CallRecord,
) -> Result<(), HookError> {
    let event = phase.event_name(method);
    let (exact, all) = {
        let table = subject.handlers.read();
        (table.snapshot(&event), table.snapshot(phase.all_name()))
    };

    if let Some(entries) = exact {
        tracing::trace!(subject = %subject.id, %event, handlers = entries.len(), "dispatching hooks");
        invoke_all(&entries, record)?;
    }

    if let Some(entries) = all {
        tracing::trace!(subject = %subject.id, %event, handlers = entries.len(), "dispatching all-tap");
        record.args.insert(0, Value::String(event));
        let outcome = invoke_all(&entries, record);
        if !record.args.is_empty() {
            record.args.remove(0);
        }
        outcome?;
    }

    Ok(())
}

fn invoke_all(entries: &[HandlerEntry], record: &mut CallRecord) -> Result<(), HookError> {
    for entry in entries {
        (entry.invoke())(entry.effective_context(), record)?;
    }
    Ok(())
}
