//! Lingo State
//!
//! Persisted editor and project state: a typed [`PropertyBag`] stored as a
//! flat TOML table of strings and string arrays, and the settings read from
//! and written to it.

#![warn(missing_docs)]

pub mod bag;
pub mod error;
pub mod settings;

// Re-exports
pub use bag::{PropertyBag, PropertyValue};
pub use error::StateError;
pub use settings::{EditorSettings, ProjectSettings, DEFAULT_HISTORY_LIMIT, DEFAULT_RESOURCE_NAME};
