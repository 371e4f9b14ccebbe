//! User-facing notifications.
//!
//! The cart store reports failed operations as short human-readable messages.
//! Delivery is fire-and-forget: a notifier never reports back to the store.

use tokio::sync::mpsc;

/// Sink for user-facing error messages.
pub trait Notifier: Send + Sync {
    /// Show an error message to the user.
    fn error(&self, message: &str);
}

/// Emits notifications as `tracing` warnings on the `rocketshoes::notify` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes::notify", "{message}");
    }
}

/// Forwards notifications into a channel for a UI to drain.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver its messages arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn error(&self, message: &str) {
        // A closed receiver means nobody is listening any more.
        let _ = self.tx.send(message.to_string());
    }
}
