/// Outcome flavor of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Ok,
    Err,
}

/// Fire-and-forget notification sink.
///
/// The core reports operation outcomes here and never looks at the
/// result; presentation (toast, terminal line, log) belongs entirely to
/// the implementor.
pub trait Notify: Send + Sync {
    fn notify(&self, message: &str, kind: NotifyKind);
}

/// Sink that drops every notification. Useful for embedding and tests.
pub struct NullNotify;

impl Notify for NullNotify {
    fn notify(&self, _message: &str, _kind: NotifyKind) {}
}
