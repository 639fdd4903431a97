//! Shared connection configuration types for imap-notify.

/// Connection settings read from the `imap` section of the config file.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImapConfig {
    /// Hostname or IP address of the IMAP server.
    pub host: String,

    /// Optional port override.
    #[cfg_attr(feature = "serde", serde(default))]
    pub port: Option<u16>,

    /// TLS settings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tls: TlsConfig,

    /// Username for IMAP authentication.
    pub username: String,

    /// Password for IMAP authentication.
    pub password: String,
}

impl ImapConfig {
    /// The port to connect to, falling back to the well-known port of the TLS mode.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.tls.mode {
            TlsMode::Implicit => 993,
            TlsMode::StartTls => 143,
        })
    }

    /// The TLS server name (SNI), falling back to the host.
    pub fn effective_tls_server_name(&self) -> &str {
        self.tls.server_name.as_deref().unwrap_or(&self.host)
    }
}

/// TLS configuration for a server.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TlsConfig {
    /// TLS mode.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: TlsMode,

    /// Optional override for the TLS server name (SNI).
    #[cfg_attr(feature = "serde", serde(default))]
    pub server_name: Option<String>,
}

/// Supported TLS modes.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum TlsMode {
    /// Implicit TLS (usually port 993).
    #[default]
    Implicit,

    /// STARTTLS upgrade (usually port 143).
    #[cfg_attr(feature = "serde", serde(rename = "starttls", alias = "start_tls"))]
    StartTls,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: TlsMode) -> ImapConfig {
        ImapConfig {
            host: "imap.example.com".to_string(),
            port: None,
            tls: TlsConfig {
                mode,
                server_name: None,
            },
            username: "user".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn default_port_follows_tls_mode() {
        assert_eq!(config(TlsMode::Implicit).effective_port(), 993);
        assert_eq!(config(TlsMode::StartTls).effective_port(), 143);
    }

    #[test]
    fn explicit_port_wins() {
        let config = ImapConfig {
            port: Some(1993),
            ..config(TlsMode::StartTls)
        };
        assert_eq!(config.effective_port(), 1993);
    }

    #[test]
    fn server_name_falls_back_to_host() {
        let mut config = config(TlsMode::Implicit);
        assert_eq!(config.effective_tls_server_name(), "imap.example.com");

        config.tls.server_name = Some("mail.example.com".to_string());
        assert_eq!(config.effective_tls_server_name(), "mail.example.com");
    }
}
