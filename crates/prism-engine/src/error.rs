//! Error types for the engine.
//!
//! Every error here belongs to setup or the control thread. The audio path
//! has no fallible operations: overflowing channels report through `bool`
//! and `Option` returns.

use std::path::PathBuf;
use thiserror::Error;

use crate::order::EffectOption;

/// Errors from the parameter store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// The same id was declared twice
    #[error("parameter '{0}' declared twice")]
    Duplicate(String),

    /// No parameter with this id
    #[error("unknown parameter '{0}'")]
    Unknown(String),

    /// A choice operation was attempted on a non-choice parameter
    #[error("parameter '{0}' is not a choice parameter")]
    NotChoice(String),

    /// The store cannot address more parameters
    #[error("parameter store is full ({0} parameters)")]
    Capacity(usize),
}

/// Errors from building or editing an effect chain order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Wrong number of slots
    #[error("order has {found} slots, expected {expected}")]
    WrongLength {
        /// Required slot count
        expected: usize,
        /// Slots supplied
        found: usize,
    },

    /// A slot value does not name an effect
    #[error("unknown effect option '{0}'")]
    UnknownOption(String),

    /// An effect appears more than once
    #[error("effect '{0}' appears more than once")]
    Duplicate(EffectOption),

    /// A slot index past the end of the order
    #[error("slot {0} out of range")]
    SlotOutOfRange(usize),
}

/// Errors from encoding or strictly decoding persisted state.
#[derive(Debug, Error)]
pub enum StateError {
    /// The blob is not valid state JSON
    #[error("malformed state: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob was written by a newer format
    #[error("unsupported state version {0}")]
    UnsupportedVersion(u32),
}

/// Errors from loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse '{path}': {source}")]
    Parse {
        /// Path of the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// A field holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error.
    pub fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        ConfigError::Invalid(reason.into())
    }
}

/// Any engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Parameter store error
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Order error
    #[error(transparent)]
    Order(#[from] OrderError),

    /// State error
    #[error(transparent)]
    State(#[from] StateError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_keeps_source() {
        let err = ConfigError::read_file("/some/engine.toml", mock_io_err());
        assert!(matches!(err, ConfigError::ReadFile { ref path, .. } if path.ends_with("engine.toml")));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/some/engine.toml"));
    }

    #[test]
    fn duplicate_param_message_names_id() {
        let err = ParamError::Duplicate("filter_freq".into());
        assert_eq!(err.to_string(), "parameter 'filter_freq' declared twice");
    }

    #[test]
    fn order_error_display() {
        let err = OrderError::WrongLength { expected: 5, found: 3 };
        assert_eq!(err.to_string(), "order has 3 slots, expected 5");
        let err = OrderError::Duplicate(EffectOption::Chorus);
        assert_eq!(err.to_string(), "effect 'Chorus' appears more than once");
    }

    #[test]
    fn engine_error_is_transparent() {
        let err: EngineError = ParamError::Unknown("nope".into()).into();
        assert_eq!(err.to_string(), "unknown parameter 'nope'");
        let err: EngineError = ConfigError::invalid("sample_rate must be positive").into();
        assert!(matches!(err, EngineError::Config(ConfigError::Invalid(_))));
    }
}
