//! Resource file codecs
//!
//! Convert between file content and the flat key → text map a store holds:
//! - JSON: nested objects, flattened to dotted keys
//! - Properties: `key=value` lines

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::StoreError;

mod json;
mod properties;

pub use json::JsonCodec;
pub use properties::PropertiesCodec;

/// Flat translations of one locale, sorted by key
pub type Translations = BTreeMap<String, String>;

/// Output formatting for writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Human-readable output; `false` writes the most compact form
    pub pretty: bool,
}

impl WriteOptions {
    /// Compact output
    #[inline]
    #[must_use]
    pub fn minified() -> Self {
        Self { pretty: false }
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Codec trait for one resource file format
///
/// `path` is only used to label errors.
pub trait ResourceCodec: Send + Sync + 'static {
    /// Decode file content
    ///
    /// # Errors
    /// Returns [`StoreError::Parse`] if the content is malformed.
    fn decode(&self, content: &str, path: &Path) -> Result<Translations, StoreError>;

    /// Encode translations
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if the translations cannot be represented.
    fn encode(&self, translations: &Translations, options: WriteOptions, path: &Path) -> Result<String, StoreError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this codec handles the given path
    fn can_decode(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
