// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when composing providers,
//! reading or writing keys, and binding configuration onto typed values.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// The main error type for configuration operations.
///
/// This enum represents all possible errors that can occur when loading providers,
/// accessing keys, or binding configuration. It is marked as `#[non_exhaustive]` to
/// allow for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use layercfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "Database:Host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key or section was not found in any provider.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// A required (non-optional) backing source was absent at load time.
    #[error("Configuration source '{source_name}' not found: {location}")]
    SourceNotFound {
        /// The name of the provider that failed to load
        source_name: String,
        /// Where the source was expected (a path, a URL, ...)
        location: String,
    },

    /// The same flattened key appeared twice within a single load.
    #[error("Duplicate key '{key}' in configuration source '{source_name}'")]
    DuplicateKey {
        /// The name of the provider that produced the duplicate
        source_name: String,
        /// The offending key
        key: String,
    },

    /// A binding target could not be constructed.
    #[error("Cannot create instance of type '{type_name}': {message}")]
    Activation {
        /// The type that could not be activated
        type_name: String,
        /// Why activation failed
        message: String,
        /// The error raised by the constructor, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value '{value}' at '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The raw value that failed to convert
        value: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A write was attempted against a configuration without any provider.
    #[error("A configuration source is not registered. Add a provider before setting '{key}'")]
    NoSources {
        /// The key that could not be written
        key: String,
    },

    /// An operation that requires a key was given an empty one.
    #[error("Configuration key must not be empty ({operation})")]
    EmptyKey {
        /// The operation that rejected the key
        operation: &'static str,
    },

    /// Binding found configuration children that match no property of the target.
    #[error("Configuration keys {keys:?} were not found on type '{type_name}'")]
    UnknownConfiguration {
        /// The target type being bound
        type_name: String,
        /// The keys that matched nothing
        keys: Vec<String>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a configuration watcher.
    #[error("Configuration watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: &str, value: &str, target_type: &str, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            value: value.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(
        key: &str,
        value: &str,
        target_type: &str,
        err: ParseFloatError,
    ) -> Self {
        ConfigError::TypeConversionError {
            key: key.to_string(),
            value: value.to_string(),
            target_type: target_type.to_string(),
            source: Box::new(err),
        }
    }

    /// Creates an Activation error for a type that has no way to be constructed.
    pub fn activation(type_name: &str, message: impl Into<String>) -> Self {
        ConfigError::Activation {
            type_name: type_name.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` for the not-found family of load errors.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::SourceNotFound { .. } => true,
            ConfigError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
