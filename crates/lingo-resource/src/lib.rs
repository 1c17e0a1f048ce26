//! Lingo Resource
//!
//! Locale resource stores and the engine that keeps them synchronized with
//! the translation key tree.
//!
//! # Overview
//!
//! - **ResourceStore**: flat key → text map of one locale
//! - **FileStore**: store backed by a JSON or properties file
//! - **ResourceSet**: key tree plus stores, mutated in lockstep
//!
//! # Example
//!
//! ```rust
//! use lingo_keys::KeyPath;
//! use lingo_resource::{MemoryStore, ResourceSet, ResourceStore};
//!
//! let en: Box<dyn ResourceStore> = Box::new(MemoryStore::with_translations(Some("en"), [("menu.open", "Open")]));
//! let nl: Box<dyn ResourceStore> = Box::new(MemoryStore::new(Some("nl")));
//!
//! let mut set = ResourceSet::new();
//! set.load(vec![en, nl]);
//! assert_eq!(set.translation(&KeyPath::parse("menu.open").unwrap(), Some("nl")), Some(""));
//!
//! let from = KeyPath::parse("menu").unwrap();
//! let to = KeyPath::parse("actions").unwrap();
//! set.rename_key(&from, &to, |_| true).unwrap();
//! assert_eq!(set.translation(&KeyPath::parse("actions.open").unwrap(), Some("en")), Some("Open"));
//! ```

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod file_store;
pub mod resource_type;
pub mod set;
pub mod store;

// Re-exports
pub use codec::{ResourceCodec, Translations, WriteOptions};
pub use error::{StoreError, SyncError};
pub use file_store::{create, discover, is_locale_tag, resource_path, FileStore};
pub use resource_type::{ResourceType, UnknownResourceType};
pub use set::{ChangeEvent, Listener, LoadReport, ResourceSet, StoreFailure, WriteReport};
pub use store::{MemoryStore, ResourceStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
