//! Conflict classification for rename and duplicate
//!
//! When the destination of a rename or duplicate already exists, the caller
//! has to confirm what happens to it. [`ConflictResolver`] decides which
//! question to ask; it never mutates anything.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::KeyError;
use crate::path::KeyPath;
use crate::tree::KeyTree;

/// Outcome of classifying a rename/duplicate destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    /// Destination is free, plain move/copy
    Clear,

    /// Destination subtree is discarded before the move/copy
    Replace,

    /// Source and destination subtrees are unioned, source values win
    Merge,
}

impl Conflict {
    /// Whether the caller has to confirm before the mutation proceeds
    #[inline]
    #[must_use]
    pub fn needs_confirmation(self) -> bool {
        !matches!(self, Self::Clear)
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question put to the caller before a conflicting rename/duplicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPrompt {
    /// Classified conflict, never [`Conflict::Clear`]
    pub conflict: Conflict,
    /// Key being moved or copied
    pub source: KeyPath,
    /// Existing key at the destination
    pub destination: KeyPath,
}

impl Display for ConflictPrompt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.conflict {
            Conflict::Replace => write!(
                f,
                "'{}' already exists and will be replaced by '{}'",
                self.destination, self.source
            ),
            Conflict::Merge => write!(
                f,
                "'{}' already exists and will be merged with '{}'",
                self.destination, self.source
            ),
            Conflict::Clear => write!(f, "'{}' is free", self.destination),
        }
    }
}

/// Pure conflict classification
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    /// Classify from the three facts that matter
    ///
    /// A leaf on either side makes it a replace, even if the other side has
    /// descendants of its own. Only two purely structural nodes merge.
    #[inline]
    #[must_use]
    pub fn classify(destination_exists: bool, destination_is_leaf: bool, source_is_leaf: bool) -> Conflict {
        if !destination_exists {
            Conflict::Clear
        } else if destination_is_leaf || source_is_leaf {
            Conflict::Replace
        } else {
            Conflict::Merge
        }
    }

    /// Classify a rename/duplicate against the current tree
    ///
    /// # Errors
    /// - [`KeyError::OverlappingPaths`] if one path is nested in the other
    /// - [`KeyError::SourceNotFound`] if the source does not exist
    pub fn inspect(tree: &KeyTree, source: &KeyPath, destination: &KeyPath) -> Result<Conflict, KeyError> {
        if source != destination && source.overlaps(destination) {
            return Err(KeyError::OverlappingPaths {
                source_key: source.to_string(),
                destination: destination.to_string(),
            });
        }

        let source_node = tree
            .get(source)
            .ok_or_else(|| KeyError::SourceNotFound(source.to_string()))?;

        if source == destination {
            return Ok(Conflict::Clear);
        }

        Ok(match tree.get(destination) {
            None => Conflict::Clear,
            Some(dest) => Self::classify(true, dest.is_leaf(), source_node.is_leaf()),
        })
    }

    /// Build the prompt for a classified conflict, `None` when there is nothing to ask
    #[must_use]
    pub fn prompt(conflict: Conflict, source: &KeyPath, destination: &KeyPath) -> Option<ConflictPrompt> {
        conflict.needs_confirmation().then(|| ConflictPrompt {
            conflict,
            source: source.clone(),
            destination: destination.clone(),
        })
    }
}
