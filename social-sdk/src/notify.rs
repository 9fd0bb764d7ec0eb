//! Transient, user-facing notifications ("toasts").
//!
//! Every failure that does not block a whole view ends up here, as do
//! confirmations such as "Publication deleted". Renderers pick a
//! [`Notifier`]: [`LogNotifier`] writes them to the log, [`ToastQueue`] keeps
//! them for a UI (or a test) to drain.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{Error, cross_log};

/// How a toast should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of a completed action.
    Info,
    /// Something failed; previously shown data stays visible.
    Error,
}

/// One transient notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Presentation hint.
    pub severity: Severity,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub description: String,
}

impl Toast {
    /// A confirmation.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// A failure, described by the error's user-facing message.
    pub fn error(error: &Error) -> Self {
        Self {
            severity: Severity::Error,
            title: "Error".to_string(),
            description: error.user_message(),
        }
    }
}

/// Sink for toasts. Implementations must not block.
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Present `toast`.
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log: errors at `warn`, the rest at `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.severity {
            Severity::Info => {
                cross_log!(info, "{}: {}", toast.title, toast.description);
            }
            Severity::Error => {
                cross_log!(warn, "{}: {}", toast.title, toast.description);
            }
        }
    }
}

/// Keeps toasts until drained. Clones share the queue.
#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    /// Take every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of pending toasts.
    pub fn len(&self) -> usize {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no toast is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, toast: Toast) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}

/// Shared notifier handle, as held by controllers and cards.
pub type SharedNotifier = Arc<dyn Notifier>;
