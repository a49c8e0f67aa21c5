//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use sesame_app::Notifier;
use sesame_core::FormErrors;
use sesame_core::form::GENERAL;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print field errors, one per line. The general message is left to the
/// notifier.
pub fn form_errors(errors: &FormErrors) {
    for (field, message) in errors.iter().filter(|(field, _)| *field != GENERAL) {
        eprintln!("  {}: {}", field.yellow(), message);
    }
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Shows view-model notifications on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        success(message);
    }

    fn error(&self, message: &str) {
        error(message);
    }
}
