//! Publisher for the joint-angle topic
//!
//! Mirrors what the arm controller sends: one 16-byte little-endian [`Phis`]
//! payload per update, QoS 0, not retained. Handy for driving the subscriber
//! without the arm attached.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::BrokerConfig;
use crate::providers::mqtt::failure_status;
use crate::types::{ConnectionStatus, Phis};
use crate::{Result, ScopeError};

/// How long `disconnect` waits for the DISCONNECT packet to go out
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Publishes [`Phis`] payloads on the configured topic
pub struct Publisher {
    client: AsyncClient,
    topic: String,
    status: watch::Receiver<ConnectionStatus>,
    cancel: CancellationToken,
}

impl Publisher {
    /// Create the client and start polling its event loop.
    ///
    /// Like the subscriber, an unreachable broker is reported through
    /// [`status`](Self::status) and retried; it is not an error here.
    /// Must be called from within a tokio runtime.
    pub fn connect(config: &BrokerConfig) -> Result<Self> {
        config.validate()?;

        let client_id = config.client_id();
        let mut options = MqttOptions::new(&client_id, &config.host, config.port);
        options
            .set_keep_alive(config.keep_alive())
            .set_credentials(&config.username, &config.password);

        let (client, eventloop) = AsyncClient::new(options, config.channel_capacity);
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let cancel = CancellationToken::new();

        info!(
            "Publishing to '{}' on {}:{} as '{}'",
            config.topic, config.host, config.port, client_id
        );

        tokio::spawn(poll_loop(eventloop, status_tx, config.reconnect_delay(), cancel.clone()));

        Ok(Self { client, topic: config.topic.clone(), status: status_rx, cancel })
    }

    /// Queue one payload for sending.
    ///
    /// Never waits: when the request queue is full (broker unreachable for a
    /// while) the payload is rejected with a retryable [`ScopeError::Publish`].
    pub fn push_phis(&self, phis: &Phis) -> Result<()> {
        self.client
            .try_publish(&self.topic, QoS::AtMostOnce, false, phis.to_payload())
            .map_err(|e| ScopeError::publish_failed(&self.topic, Box::new(e)))
    }

    /// Watch the connection status
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Send DISCONNECT, then stop the event loop.
    ///
    /// Fails with [`ScopeError::Timeout`] when the packet could not be written
    /// within two seconds, e.g. while the broker is still unreachable.
    pub async fn disconnect(self) -> Result<()> {
        if let Err(e) = self.client.try_disconnect() {
            debug!("Disconnect request not queued: {}", e);
            return Ok(());
        }

        let mut status = self.status.clone();
        let stopped = tokio::time::timeout(
            DISCONNECT_TIMEOUT,
            status.wait_for(|s| *s == ConnectionStatus::Disconnected),
        )
        .await;

        if stopped.is_err() {
            warn!("DISCONNECT not sent within {:?}", DISCONNECT_TIMEOUT);
            return Err(ScopeError::Timeout { duration: DISCONNECT_TIMEOUT });
        }
        Ok(())
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Drive the client's event loop until DISCONNECT goes out or the publisher is dropped
async fn poll_loop(
    mut eventloop: EventLoop,
    status_tx: watch::Sender<ConnectionStatus>,
    reconnect_delay: Duration,
    cancel: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = eventloop.poll() => event,
        };

        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                status_tx.send_replace(ConnectionStatus::Connected);
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("DISCONNECT sent");
                break;
            }
            Ok(event) => trace!("MQTT event: {:?}", event),
            Err(err) => {
                warn!("MQTT connection error: {}", err);
                status_tx.send_replace(failure_status(&err));

                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(reconnect_delay) => {}
                }
            }
        }
    }

    status_tx.send_replace(ConnectionStatus::Disconnected);
    debug!("Publisher event loop stopped");
}
