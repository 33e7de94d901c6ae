//! Broker connection status

use std::fmt;

/// Connection state reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Connect in progress, nothing acknowledged yet
    #[default]
    Connecting,

    /// Broker acknowledged the connection
    Connected,

    /// Connect attempt failed.
    ///
    /// `code` is the CONNACK return code when the broker refused the client,
    /// `None` when the broker could not be reached at all.
    Failed { code: Option<u8>, reason: String },

    /// Provider stopped, no further messages will arrive
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ConnectionStatus::Failed { .. })
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => f.write_str("Trying to connect ... "),
            ConnectionStatus::Connected => f.write_str("Connected to MQTT Broker!"),
            ConnectionStatus::Failed { code: Some(code), .. } => {
                write!(f, "Failed to connect, return code {}", code)
            }
            ConnectionStatus::Failed { code: None, reason } => {
                write!(f, "Failed to connect: {}", reason)
            }
            ConnectionStatus::Disconnected => f.write_str("Disconnected from MQTT Broker"),
        }
    }
}
