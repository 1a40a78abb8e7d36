//! Log-and-continue wrapper for background side effects.
//!
//! Progress synchronization and approval requests run after unrelated user actions
//! (saving a task, saving a budget line). Their failures must never make that action
//! look failed, so they return a [`Housekeeping`] instead of a `Result`. The error has
//! already been logged when the value is constructed; callers that do not care discard
//! it with `let _ =`.

use crate::errors::{Error, Result};
use tracing::{error, info};

/// Outcome of a best-effort background operation.
#[derive(Debug)]
#[must_use = "housekeeping results are logged already; discard explicitly with `let _ =`"]
pub struct Housekeeping<T> {
    result: Result<T>,
}

impl<T> Housekeeping<T> {
    /// Wraps `result`, logging a failure under `context`.
    ///
    /// Missing records are expected in background paths and logged at `info`;
    /// store and other failures are logged at `error`.
    pub(crate) fn settle(context: &str, result: Result<T>) -> Self {
        if let Err(e) = &result {
            if e.is_not_found() {
                info!("{}: {}", context, e);
            } else {
                error!("{} failed: {}", context, e);
            }
        }
        Self { result }
    }

    /// Whether the operation completed.
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// The completed value, if any.
    pub fn outcome(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// The logged error, if any.
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    /// Converts back into a plain `Result`.
    pub fn into_result(self) -> Result<T> {
        self.result
    }
}
