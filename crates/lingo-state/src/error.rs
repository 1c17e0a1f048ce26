//! Error types for persisted state

use std::path::PathBuf;

/// Errors reading, writing or interpreting a property bag
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// IO error on the state file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// State file is not a flat TOML table of strings and string arrays
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// State file
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Bag could not be serialized
    #[error("cannot serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Stored value does not have the requested type
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        /// Bag key
        key: String,
        /// Stored value
        value: String,
        /// Description of the expected type
        expected: &'static str,
    },
}

impl StateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create invalid value error
    pub fn invalid_value(key: &str, value: &str, expected: &'static str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}
