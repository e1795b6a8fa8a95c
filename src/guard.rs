//! Context guard - serializes scope-enter / register / scope-exit triples
//!
//! The engine only exposes scope push and pop as separate calls, so two
//! threads registering under different contexts could otherwise interleave
//! and attribute a registration to the wrong scope. One process-wide lock is
//! held from before the scope is entered until after it is exited.
//!
//! State changes (on/off/toggle) enter no scope but still take the lock
//! through [`serialized`], so they never land inside another thread's
//! open scope.
//!
//! Guarded calls never nest: the closures passed to [`with_context`] and
//! [`serialized`] issue exactly one engine call and never re-enter the guard.

use parking_lot::{const_mutex, Mutex};
use tracing::trace;

use crate::context::TriggerContext;
use crate::dispatcher::Dispatcher;
use crate::error::{ResultExt, Result};

static CONTEXT_GUARD: Mutex<()> = const_mutex(());

/// Exits the scope on drop if `finish` was never reached (unwinding).
struct EnteredScope<'a> {
    context: &'a TriggerContext,
    finished: bool,
}

impl EnteredScope<'_> {
    fn finish(mut self) -> Result<()> {
        self.finished = true;
        self.context.exit()
    }
}

impl Drop for EnteredScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.context.exit().warn_on_err();
        }
    }
}

/// Run one engine call inside `context`, holding the process-wide guard.
///
/// The scope is exited on every path once it was entered. If both the call
/// and the exit fail, the call's error is returned and the exit error logged.
/// If only the exit fails, its error is returned even though the call took
/// effect; callers that track engine state must record it inside `call`.
pub(crate) fn with_context<T>(
    context: &TriggerContext,
    call: impl FnOnce(&dyn Dispatcher) -> Result<T>,
) -> Result<T> {
    let _guard = CONTEXT_GUARD.lock();
    trace!(context = %context.token(), "Context guard acquired");

    context.enter()?;
    let scope = EnteredScope {
        context,
        finished: false,
    };
    let result = call(context.dispatcher().as_ref());
    let exited = scope.finish();

    match (result, exited) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(exit_err)) => Err(exit_err),
        (Err(err), exited) => {
            exited.warn_on_err();
            Err(err)
        }
    }
}

/// Run one engine call outside any scope, holding the process-wide guard.
pub(crate) fn serialized<T>(call: impl FnOnce() -> Result<T>) -> Result<T> {
    let _guard = CONTEXT_GUARD.lock();
    call()
}

#[cfg(test)]
pub(crate) fn is_held() -> bool {
    CONTEXT_GUARD.is_locked()
}
