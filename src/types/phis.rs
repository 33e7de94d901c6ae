//! Joint-angle payload published on the `pos/phis` topic

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, ScopeError};

/// Trait for types that can be decoded from a raw message payload.
pub trait PayloadData: Sized {
    /// Decode this type from the complete payload of one message.
    fn from_payload(data: &[u8]) -> Result<Self>;
}

/// Number of joint angles carried by one payload.
pub const PHIS_COUNT: usize = 4;

/// Four joint angles, in radians, as sent by the arm controller.
///
/// Wire layout is four consecutive little-endian `f32` values, 16 bytes total,
/// with no header or padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Phis(pub [f32; PHIS_COUNT]);

impl Phis {
    /// Number of values in one payload.
    pub const COUNT: usize = PHIS_COUNT;

    /// Exact payload size in bytes.
    pub const PAYLOAD_LEN: usize = Self::COUNT * size_of::<f32>();

    /// Encode into the 16-byte wire layout.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::PAYLOAD_LEN);
        for value in self.0 {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Values in payload order.
    pub fn values(&self) -> &[f32; Self::COUNT] {
        &self.0
    }
}

impl PayloadData for Phis {
    fn from_payload(data: &[u8]) -> Result<Self> {
        if data.len() != Self::PAYLOAD_LEN {
            return Err(ScopeError::payload_length(Self::PAYLOAD_LEN, data.len()));
        }

        let mut values = [0.0f32; Self::COUNT];
        for (value, chunk) in values.iter_mut().zip(data.chunks_exact(size_of::<f32>())) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Ok(Phis(values))
    }
}

impl From<[f32; PHIS_COUNT]> for Phis {
    fn from(values: [f32; PHIS_COUNT]) -> Self {
        Phis(values)
    }
}

// Printed as a tuple: `(0.1, 0.2, 0.3, 0.4)`
impl fmt::Display for Phis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "({}, {}, {}, {})", a, b, c, d)
    }
}
