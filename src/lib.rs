//! Debugging tools for robot-arm joint telemetry and drawing-robot line files.
//!
//! armscope bundles two small tools that share an error type, a config loader
//! and logging setup:
//!
//! - **Telemetry subscriber**: connects to an MQTT broker, subscribes to the
//!   joint-angle topic (`pos/phis`) and decodes each 16-byte payload into four
//!   `f32` values. A matching publisher sends the same payloads.
//! - **Line plotter**: loads a JSON lines file, splits its segments into
//!   `x1, y1, x2, y2` sequences and shows them in an interactive window.
//!
//! ## Example (subscriber)
//!
//! ```rust,no_run
//! use armscope::{Armscope, BrokerConfig, Phis, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> armscope::Result<()> {
//!     let subscription = Armscope::subscribe(&BrokerConfig::default()).await?;
//!     let mut messages = subscription.messages::<Phis>(UpdateRate::Native);
//!
//!     while let Some(message) = messages.next().await {
//!         let message = message?;
//!         println!("Received `{}` from `{}` topic", message.value, message.topic);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
pub mod adapters;
pub mod config;
mod error;
#[cfg(test)]
mod test_utils;
pub mod types;

// Stream-based subscriber architecture
pub mod connection;
pub mod driver;
pub mod provider;
pub mod providers;
pub mod stream;

// Tools
pub mod plot;
pub mod publisher;

// Core exports
pub use adapters::{Decoded, MessageAdapter};
pub use config::{BrokerConfig, PlotConfig, PlotMode, ScopeConfig};
pub use error::*;
pub use types::*;

pub use connection::Subscription;
pub use publisher::Publisher;

/// Unified entry point for the armscope tools.
pub struct Armscope;

impl Armscope {
    /// Subscribe to the configured topic.
    ///
    /// Returns once the subscriber is running; whether the broker accepted the
    /// connection is reported through [`Subscription::status_updates`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable (empty host or topic,
    /// port 0, zero channel capacity).
    pub async fn subscribe(config: &BrokerConfig) -> Result<Subscription> {
        Subscription::connect(config).await
    }

    /// Start a publisher for the configured topic.
    pub fn publisher(config: &BrokerConfig) -> Result<Publisher> {
        Publisher::connect(config)
    }

    /// Load the lines file named by `config` into coordinate sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or is not readable
    /// - The file is not valid JSON
    /// - The configured key is missing or does not hold an array of segments
    pub fn load_lines(config: &PlotConfig) -> Result<SegmentSeries> {
        plot::load_series(&config.path, &config.key)
    }
}
