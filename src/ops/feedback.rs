use std::time::{Duration, Instant};

/// How long a toast stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A transient single-line notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

/// Queue of toasts raised by user actions
#[derive(Debug, Default)]
pub struct Feedback {
    toasts: Vec<Toast>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    /// Raise "Failed to <action>". The cause is logged, never shown.
    pub fn failure(&mut self, action: &str, cause: &dyn std::error::Error) {
        tracing::error!(action, error = %cause, "remote call failed");
        self.push(ToastKind::Error, format!("Failed to {}", action));
    }

    fn push(&mut self, kind: ToastKind, message: String) {
        self.toasts.push(Toast {
            kind,
            message,
            created: Instant::now(),
        });
    }

    /// Newest toast still on screen
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Drop toasts older than `ttl`
    pub fn expire(&mut self, ttl: Duration) {
        self.toasts.retain(|t| t.created.elapsed() < ttl);
    }

    /// Take every pending toast, oldest first
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn has_errors(&self) -> bool {
        self.toasts.iter().any(|t| t.kind == ToastKind::Error)
    }
}
