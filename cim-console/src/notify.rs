use std::sync::Arc;

use mockall::automock;
use tracing::{error, info};

/// Transient messages shown to the user.
#[automock]
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn success(&self, message: &str) {
        (**self).success(message)
    }

    fn error(&self, message: &str) {
        (**self).error(message)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notify", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "notify", "{}", message);
    }
}
