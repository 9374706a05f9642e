//! Error types for `keyboard-inset`
//!
//! The inset pipeline itself never fails: missing geometry or a detached view
//! degrade to a logged no-op. These errors cover the ambient surfaces around it
//! (configuration, logging setup and demo scenario loading).
//!
//! Variants that wrap another failure keep it as `#[source]` so the full chain
//! shows up in logs.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new boxed `StringError` from a message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `keyboard-inset`
#[derive(Debug, Error)]
pub enum InsetError {
    /// Configuration could not be read or written
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration parsed but holds out-of-range values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Logging subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    LoggingError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Demo scenario file is unusable
    #[error("Invalid scenario: {0}")]
    ScenarioError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `keyboard-inset` operations
pub type Result<T> = std::result::Result<T, InsetError>;

/// Convert an error to a message suitable for showing to an end user.
pub fn get_user_friendly_error(error: &InsetError) -> String {
    match error {
        InsetError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Default settings will be used.\n\
             Check that KEYBOARD_INSET_HOME points to a writable directory."
            .to_string(),
        InsetError::InvalidConfig(reason) => {
            format!(
                "The configuration file contains an invalid value:\n\n{reason}\n\n\
                 Fix the value or delete the file to restore defaults."
            )
        }
        InsetError::LoggingError(_) => "Logging could not be initialized.\n\n\
             The log directory may be missing or read-only."
            .to_string(),
        InsetError::ScenarioError(reason) => {
            format!(
                "The scenario file could not be used:\n\n{reason}\n\n\
                 Events must be listed in non-decreasing time order."
            )
        }
        InsetError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        InsetError::JsonError(e) => {
            format!(
                "A JSON document is malformed:\n\n{e}\n\n\
                 Check the file against the documented format."
            )
        }
    }
}
