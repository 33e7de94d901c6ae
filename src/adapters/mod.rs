//! Typed decoding of raw broker messages.
//!
//! Any type implementing [`PayloadData`](crate::types::PayloadData) is a
//! [`MessageAdapter`] and can be requested from a
//! [`Subscription`](crate::Subscription):
//!
//! ```rust
//! use armscope::adapters::{Decoded, MessageAdapter};
//! use armscope::types::{MessagePacket, Phis};
//!
//! let packet = MessagePacket::new("pos/phis", Phis([1.0, 2.0, 3.0, 4.0]).to_payload(), 7);
//! let decoded = Decoded::<Phis>::from_packet(&packet).unwrap();
//!
//! assert_eq!(&*decoded.topic, "pos/phis");
//! assert_eq!(decoded.seq, 7);
//! assert_eq!(decoded.value, Phis([1.0, 2.0, 3.0, 4.0]));
//! ```

mod message_adapter;

pub use message_adapter::{Decoded, MessageAdapter};
