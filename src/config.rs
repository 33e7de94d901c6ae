//! Layered configuration for the armscope tools
//!
//! Values are resolved from, lowest to highest precedence: built-in defaults,
//! an optional YAML file, `ARMSCOPE_*` environment variables, and finally
//! command-line flags (applied by the binary).

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, ScopeError};

/// Default MQTT port
pub const DEFAULT_PORT: u16 = 1883;

/// Topic the arm controller publishes joint angles on
pub const TOPIC_PHIS: &str = "pos/phis";

/// Default lines file, relative to the working directory
pub const DEFAULT_LINES_PATH: &str = "sample_lines.json";

/// Default key of the segment array inside the lines file
pub const DEFAULT_LINES_KEY: &str = "contour";

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeConfig {
    pub broker: BrokerConfig,
    pub plot: PlotConfig,
}

/// Broker connection settings shared by subscriber and publisher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub topic: String,

    /// Fixed client id; a random one is generated from `client_id_prefix` when unset
    pub client_id: Option<String>,
    pub client_id_prefix: String,

    pub keep_alive_secs: u64,

    /// Pause between failed connect attempts
    pub reconnect_delay_ms: u64,

    /// Capacity of the request queue and of the subscriber message channel
    pub channel_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "syhub".to_string(),
            port: DEFAULT_PORT,
            username: "test".to_string(),
            password: "test".to_string(),
            topic: TOPIC_PHIS.to_string(),
            client_id: None,
            client_id_prefix: "armscope-".to_string(),
            keep_alive_secs: 60,
            reconnect_delay_ms: 1000,
            channel_capacity: 64,
        }
    }
}

impl BrokerConfig {
    /// Client id to connect with.
    ///
    /// Every call without a fixed `client_id` yields a fresh random id, so two
    /// tools started from the same config do not kick each other off the broker.
    pub fn client_id(&self) -> String {
        match &self.client_id {
            Some(id) => id.clone(),
            None => {
                let suffix: u16 = rand::thread_rng().r#gen();
                format!("{}{}", self.client_id_prefix, suffix)
            }
        }
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Reject values that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ScopeError::config_error("broker host is empty"));
        }
        if self.port == 0 {
            return Err(ScopeError::config_error("broker port must be non-zero"));
        }
        if self.topic.trim().is_empty() {
            return Err(ScopeError::config_error("topic is empty"));
        }
        if self.channel_capacity == 0 {
            return Err(ScopeError::config_error("channel_capacity must be at least 1"));
        }
        // MQTT keep alive is a 16-bit field in seconds
        if self.keep_alive_secs > u16::MAX as u64 {
            return Err(ScopeError::config_error(format!(
                "keep_alive_secs {} exceeds {}",
                self.keep_alive_secs,
                u16::MAX
            )));
        }
        Ok(())
    }
}

/// How segments are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotMode {
    /// Two polylines, one through all start points and one through all end points
    #[default]
    Series,
    /// Every segment drawn on its own from `p1` to `p2`
    Segments,
}

impl std::str::FromStr for PlotMode {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "series" => Ok(PlotMode::Series),
            "segments" => Ok(PlotMode::Segments),
            other => Err(ScopeError::config_error(format!(
                "unknown plot mode '{}' (expected 'series' or 'segments')",
                other
            ))),
        }
    }
}

/// Lines file and display settings for the plotter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    pub path: PathBuf,
    pub key: String,
    pub mode: PlotMode,
    pub title: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LINES_PATH),
            key: DEFAULT_LINES_KEY.to_string(),
            mode: PlotMode::Series,
            title: "Lines".to_string(),
        }
    }
}

impl ScopeConfig {
    /// Parse a YAML config document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| ScopeError::parse_error("config YAML", e))
    }

    /// Read a YAML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading config from {}", path.display());

        let yaml = std::fs::read_to_string(path)
            .map_err(|e| ScopeError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml(&yaml)
    }

    /// Load defaults, then the optional file, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ARMSCOPE_*` overrides through the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ARMSCOPE_HOST") {
            self.broker.host = host;
        }
        if let Some(port) = lookup("ARMSCOPE_PORT") {
            self.broker.port = port.trim().parse().map_err(|_| {
                ScopeError::config_error(format!("ARMSCOPE_PORT is not a port number: '{}'", port))
            })?;
        }
        if let Some(username) = lookup("ARMSCOPE_USERNAME") {
            self.broker.username = username;
        }
        if let Some(password) = lookup("ARMSCOPE_PASSWORD") {
            self.broker.password = password;
        }
        if let Some(topic) = lookup("ARMSCOPE_TOPIC") {
            self.broker.topic = topic;
        }
        if let Some(client_id) = lookup("ARMSCOPE_CLIENT_ID") {
            self.broker.client_id = Some(client_id);
        }
        if let Some(path) = lookup("ARMSCOPE_LINES_PATH") {
            self.plot.path = PathBuf::from(path);
        }
        if let Some(key) = lookup("ARMSCOPE_LINES_KEY") {
            self.plot.key = key;
        }
        Ok(())
    }
}
