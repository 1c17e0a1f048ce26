//! Error types for key paths and tree mutations

use crate::conflict::Conflict;

/// Errors raised before a key or tree mutation is applied
///
/// None of these leave partial state behind: every check runs before the
/// tree is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Key is empty after trimming
    #[error("translation key cannot be empty")]
    EmptyKey,

    /// Empty segment in key (leading, trailing or doubled dot)
    #[error("translation key contains an empty segment")]
    EmptySegment,

    /// Segment contains whitespace or a separator
    #[error("invalid key segment: '{0}'")]
    InvalidSegment(String),

    /// Source of a rename/duplicate does not exist
    #[error("no translation key at '{0}'")]
    SourceNotFound(String),

    /// Source and destination are nested in one another
    #[error("'{source_key}' and '{destination}' overlap; a key cannot be moved into itself")]
    OverlappingPaths {
        /// Source key
        source_key: String,
        /// Destination key
        destination: String,
    },

    /// Caller applied a mutation with a resolution that does not match the tree
    #[error("destination '{destination}' requires a {expected} resolution, got {given}")]
    UnresolvedConflict {
        /// Destination key
        destination: String,
        /// Classification computed from the tree
        expected: Conflict,
        /// Resolution supplied by the caller
        given: Conflict,
    },
}

impl KeyError {
    /// Check if the error is about the shape of a key rather than tree state
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyKey | Self::EmptySegment | Self::InvalidSegment(_) | Self::OverlappingPaths { .. }
        )
    }
}
