//! Provider trait for message sources

use crate::Result;
use crate::types::{ConnectionStatus, MessagePacket};

/// Something a provider observed on its source
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Connection state changed (including repeated failures)
    Status(ConnectionStatus),

    /// A message arrived on the subscribed topic
    Message(MessagePacket),
}

/// Trait for message sources
///
/// Providers own their network I/O and any pacing between reconnect attempts.
/// The driver only pulls events.
#[async_trait::async_trait]
pub trait Provider: Send + 'static {
    /// Get the next event
    ///
    /// Returns:
    /// - `Ok(Some(event))` - status change or message
    /// - `Ok(None)` - source ended (normal termination)
    /// - `Err(e)` - error the provider could not turn into a status
    async fn next_event(&mut self) -> Result<Option<ProviderEvent>>;

    /// Topic this provider delivers messages for
    fn topic(&self) -> &str;
}
