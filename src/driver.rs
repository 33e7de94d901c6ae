//! Driver spawns and manages the message reader task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use super::provider::{Provider, ProviderEvent};
use super::types::{ConnectionStatus, MessagePacket};

/// Provider errors in a row before the reader gives up
const MAX_ERRORS: u32 = 10;

/// Result of spawning the driver task
pub struct DriverChannels {
    /// Receiver for messages, subscribed before the task starts so nothing is missed
    pub messages: broadcast::Receiver<Arc<MessagePacket>>,
    /// Receiver for connection status updates
    pub status: watch::Receiver<ConnectionStatus>,
    /// Cancellation token for shutdown
    pub cancel: CancellationToken,
}

/// Driver spawns and manages the message reader task
///
/// The reader task owns the provider. Status changes go out on a watch channel,
/// messages on a broadcast channel so every subscriber sees every message.
pub struct Driver;

impl Driver {
    /// Spawn the reader task for the given provider
    ///
    /// `capacity` bounds how many messages a slow subscriber may fall behind
    /// before it starts skipping.
    pub fn spawn<P>(provider: P, capacity: usize) -> DriverChannels
    where
        P: Provider,
    {
        let (message_tx, message_rx) = broadcast::channel(capacity.max(1));
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);

        let cancel = CancellationToken::new();
        let cancel_reader = cancel.clone();

        tokio::spawn(async move {
            Self::reader_task(provider, message_tx, status_tx, cancel_reader).await;
        });

        DriverChannels { messages: message_rx, status: status_rx, cancel }
    }

    /// Reader task - pulls provider events and fans them out
    async fn reader_task<P>(
        mut provider: P,
        message_tx: broadcast::Sender<Arc<MessagePacket>>,
        status_tx: watch::Sender<ConnectionStatus>,
        cancel: CancellationToken,
    ) where
        P: Provider,
    {
        info!("Reader task started for topic '{}'", provider.topic());
        let mut seq = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Reader cancelled");
                    break;
                }
                result = provider.next_event() => result,
            };

            match result {
                Ok(Some(ProviderEvent::Status(status))) => {
                    error_count = 0;
                    debug!("Connection status: {:?}", status);
                    // send_replace keeps the value current even with no receivers left
                    status_tx.send_replace(status);
                }
                Ok(Some(ProviderEvent::Message(mut packet))) => {
                    error_count = 0;
                    seq += 1;
                    packet.seq = seq;

                    trace!("Message {} on '{}' ({} bytes)", seq, packet.topic, packet.len());

                    if message_tx.send(Arc::new(packet)).is_err() {
                        debug!("All message receivers dropped, shutting down");
                        break;
                    }
                }
                Ok(None) => {
                    info!("Provider ended after {} messages", seq);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Provider error ({}/{}): {}", error_count, MAX_ERRORS, e);

                    if error_count >= MAX_ERRORS {
                        error!("Too many provider errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ...
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        status_tx.send_replace(ConnectionStatus::Disconnected);
        info!("Reader task ended (forwarded {} messages)", seq);
    }
}
