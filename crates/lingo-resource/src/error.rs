//! Error types for resource stores and synchronization
//!
//! Provides error handling for:
//! - Store I/O (load/write of one locale file)
//! - Codec failures (malformed JSON or properties content)
//! - Synchronization requests rejected before any mutation

use lingo_keys::{Conflict, KeyError};
use std::path::PathBuf;

/// Errors from a single resource store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error reading or writing the backing file
    #[error("io error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Backing file content could not be decoded
    #[error("cannot parse {path}: {message}")]
    Parse {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Content could not be encoded for writing
    #[error("cannot encode {path}: {message}")]
    Encode {
        /// File that was being written
        path: PathBuf,
        /// Encoder message
        message: String,
    },

    /// Operation not supported by this store
    #[error("unsupported store operation: {0}")]
    Unsupported(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create parse error for path
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors from [`ResourceSet`](crate::ResourceSet) mutations
///
/// Every variant is raised before the tree or any store is modified.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Malformed key, missing source, overlapping paths
    #[error(transparent)]
    Key(#[from] KeyError),

    /// A replace/merge was classified and the caller declined it
    #[error("{conflict} of '{destination}' with '{source_key}' was not confirmed")]
    ConflictUnconfirmed {
        /// Classified conflict
        conflict: Conflict,
        /// Key being renamed or duplicated
        source_key: String,
        /// Existing destination key
        destination: String,
    },

    /// A store for this locale is already attached
    #[error("a store for locale '{0}' is already attached")]
    DuplicateLocale(String),

    /// No store for this locale
    #[error("no store attached for locale '{0}'")]
    UnknownLocale(String),

    /// Translation values can only be set on leaf keys
    #[error("'{0}' is not a translation key")]
    NotALeaf(String),
}

impl SyncError {
    /// Check if the caller declined a conflict
    #[inline]
    #[must_use]
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, Self::ConflictUnconfirmed { .. })
    }
}

/// Locale label used in messages for the locale-less default store
pub(crate) fn locale_label(locale: Option<&str>) -> String {
    locale.unwrap_or("default").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::parse_error("en/translations.json", "expected object");
        assert_eq!(err.to_string(), "cannot parse en/translations.json: expected object");
    }

    #[test]
    fn sync_error_wraps_key_error() {
        let err: SyncError = KeyError::EmptyKey.into();
        assert_eq!(err.to_string(), "translation key cannot be empty");
        assert!(!err.is_unconfirmed());
    }

    #[test]
    fn unconfirmed_display() {
        let err = SyncError::ConflictUnconfirmed {
            conflict: Conflict::Merge,
            source_key: "a".into(),
            destination: "d".into(),
        };
        assert!(err.is_unconfirmed());
        assert_eq!(err.to_string(), "merge of 'd' with 'a' was not confirmed");
    }
}
