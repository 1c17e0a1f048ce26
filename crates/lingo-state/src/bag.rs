//! Typed property bag
//!
//! Values are kept as strings or string lists and converted on access. On
//! disk the bag is a flat TOML table whose values are strings or arrays of
//! strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

use crate::error::StateError;

/// One stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Scalar, stored as its string form
    Text(String),
    /// Ordered list of strings
    List(Vec<String>),
}

/// String key → value map with typed accessors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyBag {
    /// Empty bag
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a bag from a TOML file; a missing file yields an empty bag
    ///
    /// # Errors
    /// Returns [`StateError`] if the file cannot be read or is not a flat
    /// table of strings and string arrays.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file, using defaults");
                return Ok(Self::new());
            }
            Err(e) => return Err(StateError::io_error(path, e)),
        };
        toml::from_str(&content).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the bag to a TOML file, creating parent directories
    ///
    /// # Errors
    /// Returns [`StateError`] if the file cannot be written.
    pub fn store(&self, path: &Path) -> Result<(), StateError> {
        let content = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::io_error(parent, e))?;
        }
        fs::write(path, content).map_err(|e| StateError::io_error(path, e))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a key is set
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a key
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    /// Raw string value, `None` if missing or a list
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.values.get(key)? {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::List(_) => None,
        }
    }

    /// Set a string value
    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), PropertyValue::Text(value.into()));
    }

    /// Boolean value (`true`/`false`, case-insensitive)
    ///
    /// # Errors
    /// Returns [`StateError::InvalidValue`] for anything else.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, StateError> {
        self.get_string(key)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(StateError::invalid_value(key, raw, "a boolean")),
            })
            .transpose()
    }

    /// Set a boolean value
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_string(key, value.to_string());
    }

    /// Integer value
    ///
    /// # Errors
    /// Returns [`StateError::InvalidValue`] if the value is not an integer.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>, StateError> {
        self.get_string(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| StateError::invalid_value(key, raw, "an integer"))
            })
            .transpose()
    }

    /// Set an integer value
    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set_string(key, value.to_string());
    }

    /// List value in stored order; a missing key is empty and a scalar is
    /// a single item
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(PropertyValue::List(items)) => items.clone(),
            Some(PropertyValue::Text(text)) => vec![text.clone()],
            None => Vec::new(),
        }
    }

    /// Set a list value, kept item for item
    pub fn set_list<I, S>(&mut self, key: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = items.into_iter().map(|item| item.as_ref().to_string()).collect();
        self.values.insert(key.to_string(), PropertyValue::List(items));
    }

    /// Value parsed with [`FromStr`], for enums and other named values
    ///
    /// # Errors
    /// Returns [`StateError::InvalidValue`] if parsing fails.
    pub fn get_enum<T: FromStr>(&self, key: &str) -> Result<Option<T>, StateError> {
        self.get_string(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| StateError::invalid_value(key, raw, std::any::type_name::<T>()))
            })
            .transpose()
    }

    /// Set a value through its [`Display`] form
    pub fn set_enum<T: Display>(&mut self, key: &str, value: &T) {
        self.set_string(key, value.to_string());
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Typed value or `default`, logging unreadable values
pub(crate) fn or_default<T>(value: Result<Option<T>, StateError>, default: T) -> T {
    match value {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(error) => {
            tracing::warn!(%error, "ignoring unreadable setting");
            default
        }
    }
}
