//! Command implementations.

pub mod auth;
pub mod users;

use anyhow::{Error, anyhow};

use sesame_core::FormErrors;

use crate::output;

/// Report a rejected submission: field errors go to stderr and the command
/// fails with `what`.
pub(crate) fn rejected(errors: FormErrors, what: &str) -> Error {
    output::form_errors(&errors);
    match errors.general() {
        Some(message) => anyhow!("{}: {}", what, message),
        None => anyhow!("{}", what),
    }
}
