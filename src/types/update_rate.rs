//! Output rate control for message streams

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Update rate for message streams
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every message, as fast as the broker delivers them
    #[default]
    Native,

    /// At most this many messages per second, latest wins.
    /// `Max(0)` is treated as Native.
    Max(u32),
}

impl UpdateRate {
    /// Build from an optional `--max-rate` value
    pub fn from_max_hz(hz: Option<u32>) -> Self {
        match hz {
            Some(hz) if hz > 0 => UpdateRate::Max(hz),
            _ => UpdateRate::Native,
        }
    }

    /// Get throttle interval if needed
    pub fn throttle_interval(self) -> Option<Duration> {
        match self {
            UpdateRate::Native | UpdateRate::Max(0) => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}
