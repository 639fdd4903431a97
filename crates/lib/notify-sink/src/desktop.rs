//! OS notification sink.

/// The notification capability is not available in this environment.
#[derive(Debug, thiserror::Error)]
#[error("desktop notifications are unavailable: {reason}")]
pub struct MissingCapabilityError {
    /// Why the capability check failed.
    pub reason: String,
}

/// Sink raising notifications through the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopSink {
    /// Identification of the notification server, when the platform reports one.
    pub server: Option<String>,
}

/// Check once that desktop notifications can be delivered.
///
/// On freedesktop platforms this asks the notification server to identify
/// itself over D-Bus; elsewhere the platform service is assumed present.
pub fn check_capability() -> Result<DesktopSink, MissingCapabilityError> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        let info =
            notify_rust::get_server_information().map_err(|error| MissingCapabilityError {
                reason: error.to_string(),
            })?;

        tracing::debug!(
            server_name = %info.name,
            server_vendor = %info.vendor,
            server_version = %info.version,
            "found notification server"
        );

        Ok(DesktopSink {
            server: Some(format!("{} {}", info.name, info.version)),
        })
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        Ok(DesktopSink { server: None })
    }
}

impl crate::NotificationSink for DesktopSink {
    async fn notify(&self, notification: crate::Notification) {
        let timeout_ms = u32::try_from(notification.timeout.as_millis()).unwrap_or(u32::MAX);

        let shown = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new()
                .summary(&notification.title)
                .body(&notification.message)
                .appname(&notification.app_name)
                .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
                .show()
                .map(drop)
        })
        .await;

        match shown {
            Ok(Ok(())) => tracing::debug!("notification shown"),
            Ok(Err(error)) => tracing::warn!(%error, "failed to show notification"),
            Err(error) => tracing::warn!(%error, "notification task failed"),
        }
    }
}
