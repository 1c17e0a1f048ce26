//! Error types for the editor session
//!
//! Wraps the errors of the lower layers and adds the project lifecycle
//! failures.

use lingo_keys::KeyError;
use lingo_resource::{StoreError, SyncError};
use lingo_state::StateError;
use std::path::PathBuf;

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Malformed translation key
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Rejected key or store mutation
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Resource file failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings file failure
    #[error(transparent)]
    State(#[from] StateError),

    /// Configuration file could not be read
    #[error("cannot load config {path}: {message}")]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Reason it could not be used
        message: String,
    },

    /// Operation needs an open project
    #[error("no project is open")]
    NoProject,

    /// Project path is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory holds no resources of the project's name and type
    #[error("no translation resources found in {0}")]
    EmptyProject(PathBuf),

    /// The open project has unsaved changes
    #[error("the open project has unsaved changes")]
    UnsavedChanges,

    /// Locale tag is not well formed
    #[error("invalid locale: '{0}'")]
    InvalidLocale(String),
}

impl EditorError {
    /// Check if the caller declined a rename/duplicate conflict
    #[must_use]
    pub fn is_unconfirmed(&self) -> bool {
        matches!(self, Self::Sync(e) if e.is_unconfirmed())
    }
}
