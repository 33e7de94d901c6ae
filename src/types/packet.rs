//! Message packet type flowing from providers to subscribers

use std::sync::Arc;

/// Raw message received from the broker
///
/// This is the unit that flows through the driver. Decoding into typed values
/// happens on the subscriber side, so one malformed payload never stops the
/// receive loop.
#[derive(Debug, Clone)]
pub struct MessagePacket {
    /// Topic the message was published on
    pub topic: Arc<str>,

    /// Payload bytes (shared, never copied after receipt)
    pub payload: Arc<[u8]>,

    /// Monotonic counter assigned by the driver, starting at 1
    pub seq: u64,
}

impl MessagePacket {
    /// Create a new packet
    pub fn new(topic: impl Into<Arc<str>>, payload: impl Into<Arc<[u8]>>, seq: u64) -> Self {
        Self { topic: topic.into(), payload: payload.into(), seq }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
