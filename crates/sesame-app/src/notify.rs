//! User-facing notifications.

use tracing::{info, warn};

/// Short transient messages shown to the user after a mutation.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that writes messages to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "sesame::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        warn!(target: "sesame::notify", "{}", message);
    }
}
