use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NotifyKind {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotifyKind::Info => "info",
            NotifyKind::Success => "success",
            NotifyKind::Warning => "warning",
            NotifyKind::Error => "error",
        })
    }
}

/// Shows short-lived messages to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotifyKind, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(NotifyKind, &str) + Send + Sync,
{
    fn notify(&self, kind: NotifyKind, message: &str) {
        self(kind, message)
    }
}

/// Notifier that only logs, for frontends without a toast area
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Error => tracing::error!(%kind, "{message}"),
            NotifyKind::Warning => tracing::warn!(%kind, "{message}"),
            NotifyKind::Info | NotifyKind::Success => tracing::info!(%kind, "{message}"),
        }
    }
}
