//! Lingo Editor
//!
//! Session layer on top of the key tree and resource stores: project
//! lifecycle, persisted editor state, and the background release check.
//!
//! # Example
//!
//! ```rust,no_run
//! use lingo_editor::{Editor, EditorConfig};
//! use std::path::Path;
//!
//! let mut editor = Editor::launch(EditorConfig::default())?;
//! editor.import_project(Path::new("./locales"))?;
//! editor.rename_key("menu.open", "menu.load", |_| true)?;
//! let report = editor.save_project()?;
//! assert!(report.is_success());
//! # Ok::<(), lingo_editor::EditorError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod session;
pub mod version;

// Re-exports
pub use config::EditorConfig;
pub use error::EditorError;
pub use session::{Editor, Project};
pub use version::{check_for_update, is_newer, ReleaseInfo, VersionError, VersionSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
