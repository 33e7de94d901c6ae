//! MQTT provider backed by rumqttc

use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Packet, QoS,
};
use tracing::{debug, info, trace, warn};

use crate::config::BrokerConfig;
use crate::provider::{Provider, ProviderEvent};
use crate::types::{ConnectionStatus, MessagePacket};
use crate::{Result, ScopeError};

/// Provider that subscribes to one topic on an MQTT broker
///
/// Reconnecting is left to rumqttc: after a failed poll the next poll dials
/// again. The provider only waits `reconnect_delay` in between and
/// resubscribes whenever the broker acknowledges a new connection.
pub struct MqttProvider {
    client: AsyncClient,
    eventloop: EventLoop,
    topic: String,
    reconnect_delay: Duration,

    /// Set after a failed poll, consumed before the next one
    backoff_pending: bool,
}

impl MqttProvider {
    /// Build the client. No network traffic happens until the first event is pulled.
    pub fn new(config: &BrokerConfig) -> Result<Self> {
        config.validate()?;

        let client_id = config.client_id();
        let mut options = MqttOptions::new(&client_id, &config.host, config.port);
        options
            .set_keep_alive(config.keep_alive())
            .set_credentials(&config.username, &config.password)
            .set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(options, config.channel_capacity);

        info!(
            "MQTT provider for {}:{} as '{}' on topic '{}'",
            config.host, config.port, client_id, config.topic
        );

        Ok(Self {
            client,
            eventloop,
            topic: config.topic.clone(),
            reconnect_delay: config.reconnect_delay(),
            backoff_pending: false,
        })
    }

    fn subscribe(&self) -> Result<()> {
        self.client.try_subscribe(&self.topic, QoS::AtMostOnce).map_err(|e| {
            ScopeError::connection_failed_with_source(
                format!("could not queue subscription to '{}'", self.topic),
                Box::new(e),
            )
        })
    }
}

/// MQTT 3.1.1 CONNACK return code
pub fn return_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}

/// Map a failed poll to the status reported to the user
pub fn failure_status(err: &ConnectionError) -> ConnectionStatus {
    match err {
        ConnectionError::ConnectionRefused(code) => {
            ConnectionStatus::Failed { code: Some(return_code(*code)), reason: format!("{:?}", code) }
        }
        other => ConnectionStatus::Failed { code: None, reason: other.to_string() },
    }
}

#[async_trait::async_trait]
impl Provider for MqttProvider {
    async fn next_event(&mut self) -> Result<Option<ProviderEvent>> {
        if self.backoff_pending {
            self.backoff_pending = false;
            tokio::time::sleep(self.reconnect_delay).await;
        }

        loop {
            match self.eventloop.poll().await {
                // Refused CONNACKs surface as ConnectionError::ConnectionRefused
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    debug!("CONNACK received (session_present={})", ack.session_present);
                    self.subscribe()?;
                    return Ok(Some(ProviderEvent::Status(ConnectionStatus::Connected)));
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    trace!("PUBLISH on '{}' ({} bytes)", publish.topic, publish.payload.len());
                    // seq is assigned by the driver
                    let packet = MessagePacket::new(publish.topic, publish.payload.to_vec(), 0);
                    return Ok(Some(ProviderEvent::Message(packet)));
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    debug!("Subscribed to '{}' ({:?})", self.topic, ack.return_codes);
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("Broker sent DISCONNECT");
                    return Ok(Some(ProviderEvent::Status(ConnectionStatus::Connecting)));
                }
                Ok(event) => {
                    trace!("MQTT event: {:?}", event);
                }
                Err(err) => {
                    warn!("MQTT connection error: {}", err);
                    self.backoff_pending = true;
                    return Ok(Some(ProviderEvent::Status(failure_status(&err))));
                }
            }
        }
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_codes_follow_mqtt_311() {
        assert_eq!(return_code(ConnectReturnCode::Success), 0);
        assert_eq!(return_code(ConnectReturnCode::BadUserNamePassword), 4);
        assert_eq!(return_code(ConnectReturnCode::NotAuthorized), 5);
    }

    #[test]
    fn refused_connection_carries_return_code() {
        let status =
            failure_status(&ConnectionError::ConnectionRefused(ConnectReturnCode::NotAuthorized));
        assert_eq!(status.to_string(), "Failed to connect, return code 5");
    }

    #[test]
    fn transport_failure_has_no_return_code() {
        let err = ConnectionError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        match failure_status(&err) {
            ConnectionStatus::Failed { code: None, reason } => assert!(!reason.is_empty()),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_connecting() {
        let config = BrokerConfig { host: String::new(), ..BrokerConfig::default() };
        assert!(matches!(MqttProvider::new(&config), Err(ScopeError::Config { .. })));
    }
}
