//! Notification payload and sink interface.

use std::time::Duration;

/// A single desktop notification.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Notification {
    /// Summary line.
    pub title: String,

    /// Body text.
    pub message: String,

    /// Name of the application raising the notification.
    pub app_name: String,

    /// How long the notification stays on screen.
    pub timeout: Duration,
}

/// A fire-and-forget notification sink.
///
/// Delivery is best-effort: failures are the sink's business and are
/// never reported back to the caller.
pub trait NotificationSink {
    /// Raise the notification.
    ///
    /// Resolves once the notification has been handed off for display.
    fn notify(&self, notification: Notification) -> impl std::future::Future<Output = ()>;
}

impl<T> NotificationSink for &T
where
    T: NotificationSink + ?Sized,
{
    fn notify(&self, notification: Notification) -> impl std::future::Future<Output = ()> {
        (**self).notify(notification)
    }
}
