//! Message adapter trait for typed payload decoding

use std::sync::Arc;

use crate::Result;
use crate::types::{MessagePacket, PayloadData};

/// Converts a raw message into a typed value.
///
/// Runs once per received message on the subscriber side. A failed decode is
/// reported for that message only; the stream keeps going.
pub trait MessageAdapter: Sized {
    fn adapt(packet: &MessagePacket) -> Result<Self>;
}

impl<T: PayloadData> MessageAdapter for T {
    fn adapt(packet: &MessagePacket) -> Result<Self> {
        T::from_payload(&packet.payload)
    }
}

/// A decoded message together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub topic: Arc<str>,
    pub seq: u64,
    pub value: T,
}

impl<T: MessageAdapter> Decoded<T> {
    /// Decode a packet, keeping its topic and sequence number.
    pub fn from_packet(packet: &MessagePacket) -> Result<Self> {
        let value = T::adapt(packet)?;
        Ok(Self { topic: Arc::clone(&packet.topic), seq: packet.seq, value })
    }
}
