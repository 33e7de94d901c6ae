//! Core types shared by the subscriber, publisher and plotter.
//!
//! - [`Phis`] is the fixed 16-byte joint-angle payload, decoded through [`PayloadData`]
//! - [`MessagePacket`] is a raw message as it leaves the provider
//! - [`ConnectionStatus`] tracks the broker connection and prints the user-facing lines
//! - [`UpdateRate`] controls how often decoded messages are emitted
//! - [`Segment`] and [`SegmentSeries`] hold a loaded lines file
//!
//! ## Usage Example
//!
//! ```rust
//! use armscope::types::{MessagePacket, PayloadData, Phis};
//!
//! let payload = Phis([0.1, 0.2, 0.3, 0.4]).to_payload();
//! let packet = MessagePacket::new("pos/phis", payload, 1);
//!
//! let phis = Phis::from_payload(&packet.payload).unwrap();
//! assert_eq!(phis.values(), &[0.1, 0.2, 0.3, 0.4]);
//! ```

mod packet;
mod phis;
mod segment;
mod status;
mod update_rate;

pub use packet::MessagePacket;
pub use phis::{PHIS_COUNT, PayloadData, Phis};
pub use segment::{Segment, SegmentSeries};
pub use status::ConnectionStatus;
pub use update_rate::UpdateRate;
