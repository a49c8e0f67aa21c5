//! Mutation state tracking.

use std::sync::{Mutex, MutexGuard, PoisonError};

use sesame_core::FormErrors;

/// Message reported when a mutation is submitted while it is still running.
pub(crate) const BUSY_MESSAGE: &str = "A request is already in progress";

/// Observable state of one mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    /// The mutation is running.
    pub is_pending: bool,
    /// Field and general errors of the last failed attempt.
    pub errors: FormErrors,
    /// General message of the last failed attempt.
    pub error: Option<String>,
}

/// Holds the state of one kind of mutation and admits one run at a time.
#[derive(Debug, Default)]
pub(crate) struct MutationSlot {
    state: Mutex<MutationState>,
}

impl MutationSlot {
    fn lock(&self) -> MutexGuard<'_, MutationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the mutation as running. Fails with a general form error when it
    /// already is.
    pub(crate) fn try_begin(&self) -> Result<Ticket<'_>, FormErrors> {
        let mut state = self.lock();
        if state.is_pending {
            return Err(FormErrors::general_message(BUSY_MESSAGE));
        }
        state.is_pending = true;
        Ok(Ticket { slot: self })
    }

    pub(crate) fn snapshot(&self) -> MutationState {
        self.lock().clone()
    }

    pub(crate) fn clear_errors(&self) {
        let mut state = self.lock();
        state.errors.clear();
        state.error = None;
    }
}

/// A running mutation. Dropping it without recording an outcome just ends
/// the run.
#[derive(Debug)]
pub(crate) struct Ticket<'a> {
    slot: &'a MutationSlot,
}

impl Ticket<'_> {
    pub(crate) fn succeed(self) {
        let mut state = self.slot.lock();
        state.errors.clear();
        state.error = None;
    }

    pub(crate) fn fail(self, errors: FormErrors) {
        let mut state = self.slot.lock();
        state.error = errors.general().map(str::to_string);
        state.errors = errors;
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.slot.lock().is_pending = false;
    }
}
