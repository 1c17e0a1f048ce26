//! Lingo Keys
//!
//! Dot-delimited translation keys and the tree that organizes them.
//!
//! # Overview
//!
//! - **KeyPath**: validated key such as `menu.file.open`
//! - **KeyTree**: ordered tree with leaf/structural nodes, rename, duplicate
//!   and merge, plus expansion/selection bookkeeping
//! - **ConflictResolver**: decides replace vs merge before a rename/duplicate
//!
//! # Example
//!
//! ```rust
//! use lingo_keys::{Conflict, ConflictResolver, KeyPath, KeyTree};
//!
//! let mut tree = KeyTree::new();
//! tree.insert(&KeyPath::parse("menu.file.open").unwrap());
//! tree.insert(&KeyPath::parse("menu.file.close").unwrap());
//!
//! let from = KeyPath::parse("menu.file").unwrap();
//! let to = KeyPath::parse("menu.document").unwrap();
//! let conflict = ConflictResolver::inspect(&tree, &from, &to).unwrap();
//! assert_eq!(conflict, Conflict::Clear);
//!
//! tree.rename(&from, &to, conflict).unwrap();
//! assert!(tree.contains_leaf(&KeyPath::parse("menu.document.open").unwrap()));
//! ```

#![warn(missing_docs)]

pub mod conflict;
pub mod error;
pub mod path;
pub mod tree;

// Re-exports
pub use conflict::{Conflict, ConflictPrompt, ConflictResolver};
pub use error::KeyError;
pub use path::KeyPath;
pub use tree::{KeyNode, KeyTree, LeafMove, NodeId};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for key operations
    pub use crate::{Conflict, ConflictPrompt, ConflictResolver, KeyError, KeyPath, KeyTree, LeafMove};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
