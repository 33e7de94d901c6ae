//! Error types for the armscope tools.
//!
//! All errors implement `std::error::Error` and carry enough context to tell the
//! user what went wrong and, where it makes sense, what to try next.
//!
//! ## Error Categories
//!
//! - **Connection Errors**: The broker could not be reached or refused the client
//! - **File Errors**: Problems reading a lines file or a config file
//! - **Payload Errors**: A telemetry message did not have the fixed 16-byte layout
//! - **Parse Errors**: Malformed JSON or YAML documents
//! - **Config Errors**: Values that cannot be used to build a client
//!
//! ## Recovery
//!
//! ```rust
//! use armscope::ScopeError;
//!
//! let error = ScopeError::connection_failed("broker not reachable");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for armscope operations.
pub type Result<T, E = ScopeError> = std::result::Result<T, E>;

/// Main error type for armscope operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScopeError {
    #[error("Failed to connect to broker: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed payload: expected {expected} bytes, found {found}")]
    Payload { expected: usize, found: usize },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Field '{field}' not found in document")]
    FieldNotFound { field: String },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("Failed to publish on '{topic}'")]
    Publish {
        topic: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Subscriber fell behind, {skipped} messages skipped")]
    Lagged { skipped: u64 },

    #[error("Plot window error: {reason}")]
    Render { reason: String },
}

impl ScopeError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ScopeError::Connection { .. } => true,
            ScopeError::Timeout { .. } => true,
            ScopeError::Publish { .. } => true,
            ScopeError::Lagged { .. } => true,
            ScopeError::File { .. } => false,
            ScopeError::Payload { .. } => false,
            ScopeError::Parse { .. } => false,
            ScopeError::FieldNotFound { .. } => false,
            ScopeError::Config { .. } => false,
            ScopeError::Render { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ScopeError::Connection { .. } => vec![
                "Check that the broker host resolves and is reachable",
                "Verify the broker port (1883 for plain MQTT)",
                "Check the username and password",
            ],
            ScopeError::File { .. } => vec![
                "Check the file exists in the working directory",
                "Check file permissions",
            ],
            ScopeError::Payload { .. } => vec![
                "Check the publisher sends four 32-bit floats per message",
                "Make sure nothing else publishes on the same topic",
            ],
            ScopeError::Parse { .. } => vec![
                "Validate the document syntax",
                "Check numeric fields are plain numbers",
            ],
            ScopeError::FieldNotFound { .. } => vec![
                "Check the key name (default 'contour')",
                "Pass --key to select another array",
            ],
            ScopeError::Timeout { .. } => vec![
                "Increase the timeout",
                "Verify the broker is responding",
            ],
            ScopeError::Config { .. } => vec![
                "Review the config file and ARMSCOPE_* environment variables",
                "Remove the offending value to fall back to the default",
            ],
            ScopeError::Publish { .. } => vec![
                "Check the connection to the broker",
                "Lower the publish rate",
            ],
            ScopeError::Lagged { .. } => vec![
                "Throttle the output with --max-rate",
                "Increase channel_capacity in the config",
            ],
            ScopeError::Render { .. } => vec![
                "Check a display is available (DISPLAY or WAYLAND_DISPLAY)",
                "Run the plotter from a desktop session",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        ScopeError::File { path, source }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        ScopeError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        ScopeError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for payloads that do not match the fixed layout.
    pub fn payload_length(expected: usize, found: usize) -> Self {
        ScopeError::Payload { expected, found }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl ToString) -> Self {
        ScopeError::Parse { context: context.into(), details: details.to_string() }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        ScopeError::Config { reason: reason.into() }
    }

    /// Helper constructor for publish errors with source.
    pub fn publish_failed(
        topic: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        ScopeError::Publish { topic: topic.into(), source: Some(source) }
    }
}
