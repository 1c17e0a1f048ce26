//! Resource store contract
//!
//! A store is the flat key → text map of one locale. The synchronization
//! engine only talks to stores through [`ResourceStore`]; how a store is
//! persisted is up to the implementation.

use std::collections::BTreeMap;

use crate::codec::{Translations, WriteOptions};
use crate::error::StoreError;

/// Flat translation store for one locale
pub trait ResourceStore: Send {
    /// Locale tag, `None` for the locale-less default store
    fn locale(&self) -> Option<&str>;

    /// Human-readable name used in reports
    fn label(&self) -> String {
        crate::error::locale_label(self.locale())
    }

    /// Text for a key
    fn get(&self, key: &str) -> Option<&str>;

    /// Set the text for a key
    fn set(&mut self, key: &str, value: String);

    /// Remove a key, returning its old text
    fn remove(&mut self, key: &str) -> Option<String>;

    /// All keys, sorted
    fn keys(&self) -> Vec<String>;

    /// Whether the key is present (an empty value counts)
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replace the in-memory content with the backing data
    ///
    /// # Errors
    /// Returns [`StoreError`] if the backing data cannot be read or decoded.
    fn load(&mut self) -> Result<(), StoreError>;

    /// Persist the in-memory content
    ///
    /// # Errors
    /// Returns [`StoreError`] if the content cannot be encoded or written.
    fn write(&self, options: WriteOptions) -> Result<(), StoreError>;
}

/// In-memory store without backing data
///
/// `load` and `write` succeed without doing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    locale: Option<String>,
    translations: Translations,
}

impl MemoryStore {
    /// Empty store for a locale
    #[inline]
    #[must_use]
    pub fn new(locale: Option<&str>) -> Self {
        Self {
            locale: locale.map(str::to_string),
            translations: BTreeMap::new(),
        }
    }

    /// Store pre-filled with translations
    #[must_use]
    pub fn with_translations<I, K, V>(locale: Option<&str>, translations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            locale: locale.map(str::to_string),
            translations: translations.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Current content
    #[inline]
    #[must_use]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }
}

impl ResourceStore for MemoryStore {
    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.translations.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: String) {
        self.translations.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.translations.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.translations.keys().cloned().collect()
    }

    fn load(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn write(&self, _options: WriteOptions) -> Result<(), StoreError> {
        Ok(())
    }
}
