//! Subscription to a broker topic

use std::sync::{Arc, Mutex, PoisonError};

use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::adapters::{Decoded, MessageAdapter};
use crate::config::BrokerConfig;
use crate::driver::Driver;
use crate::provider::Provider;
use crate::providers::MqttProvider;
use crate::stream::ThrottleExt;
use crate::types::{ConnectionStatus, MessagePacket, UpdateRate};
use crate::{Result, ScopeError};

struct Receivers {
    /// Created before the driver started; handed to the first `messages` call
    primed: Option<broadcast::Receiver<Arc<MessagePacket>>>,

    /// Never read, only used to create further receivers
    template: broadcast::Receiver<Arc<MessagePacket>>,
}

/// Live subscription to one topic
pub struct Subscription {
    receivers: Mutex<Receivers>,

    /// Status watch receiver
    status: watch::Receiver<ConnectionStatus>,

    topic: String,

    /// Cancellation token for stopping the driver
    cancel: CancellationToken,
}

impl Subscription {
    /// Connect to the broker described by `config` and subscribe to its topic.
    ///
    /// Returns as soon as the driver is running. Connection progress is
    /// reported through [`status_updates`](Self::status_updates); a broker that
    /// cannot be reached is retried, not returned as an error.
    pub async fn connect(config: &BrokerConfig) -> Result<Self> {
        info!("Subscribing to '{}' on {}:{}", config.topic, config.host, config.port);

        let provider = MqttProvider::new(config)?;
        Ok(Self::from_provider(provider, config.channel_capacity))
    }

    /// Run a subscription over any provider.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_provider<P: Provider>(provider: P, capacity: usize) -> Self {
        let topic = provider.topic().to_string();
        let channels = Driver::spawn(provider, capacity);
        let template = channels.messages.resubscribe();

        Self {
            receivers: Mutex::new(Receivers { primed: Some(channels.messages), template }),
            status: channels.status,
            topic,
            cancel: channels.cancel,
        }
    }

    /// Stream of decoded messages.
    ///
    /// The first call sees every message since the subscription started; later
    /// calls start at the next message. Each item is decoded on its own, so a
    /// malformed payload yields one `Err` and the stream continues. Falling
    /// behind by more than the channel capacity yields [`ScopeError::Lagged`].
    pub fn messages<T>(&self, rate: UpdateRate) -> BoxStream<'static, Result<Decoded<T>>>
    where
        T: MessageAdapter + Send + 'static,
    {
        let receiver = {
            let mut receivers = self.receivers.lock().unwrap_or_else(PoisonError::into_inner);
            match receivers.primed.take() {
                Some(primed) => primed,
                None => receivers.template.resubscribe(),
            }
        };

        let decoded = BroadcastStream::new(receiver).map(|item| match item {
            Ok(packet) => Decoded::<T>::from_packet(&packet),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => Err(ScopeError::Lagged { skipped }),
        });

        match rate.throttle_interval() {
            None => decoded.boxed(),
            Some(interval) => decoded.throttle(interval).boxed(),
        }
    }

    /// Connection status changes, starting with the current status
    pub fn status_updates(&self) -> impl Stream<Item = ConnectionStatus> + 'static {
        WatchStream::new(self.status.clone())
    }

    /// Current connection status
    pub fn current_status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Topic this subscription delivers
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Stop the driver. Message streams end once buffered messages are drained.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        debug!("Dropping subscription to '{}'", self.topic);
        self.cancel.cancel();
    }
}
