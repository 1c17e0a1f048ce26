//! File-backed resource stores and their discovery in a project directory
//!
//! Layout per format:
//! - JSON: `<dir>/<locale>/<name>.json`
//! - Properties: `<dir>/<name>.properties` (default) and
//!   `<dir>/<name>_<locale>.properties`

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{Translations, WriteOptions};
use crate::error::StoreError;
use crate::resource_type::ResourceType;
use crate::store::ResourceStore;

/// Store backed by one resource file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
    kind: ResourceType,
    locale: Option<String>,
    translations: Translations,
}

impl FileStore {
    /// Unloaded store for a file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: ResourceType, locale: Option<&str>) -> Self {
        Self {
            path: path.into(),
            kind,
            locale: locale.map(str::to_string),
            translations: Translations::new(),
        }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File format
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Current in-memory content
    #[inline]
    #[must_use]
    pub fn translations(&self) -> &Translations {
        &self.translations
    }
}

impl ResourceStore for FileStore {
    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn label(&self) -> String {
        self.path.display().to_string()
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
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::io_error(&self.path, e))?;
        self.translations = self.kind.codec().decode(&content, &self.path)?;
        tracing::debug!(path = %self.path.display(), keys = self.translations.len(), "loaded resource");
        Ok(())
    }

    fn write(&self, options: WriteOptions) -> Result<(), StoreError> {
        let content = self.kind.codec().encode(&self.translations, options, &self.path)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io_error(parent, e))?;
        }
        fs::write(&self.path, content).map_err(|e| StoreError::io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), keys = self.translations.len(), "wrote resource");
        Ok(())
    }
}

/// Path of the resource file for a locale
#[must_use]
pub fn resource_path(dir: &Path, kind: ResourceType, locale: Option<&str>, name: &str) -> PathBuf {
    match (kind, locale) {
        (ResourceType::Json, Some(locale)) => dir.join(locale).join(format!("{name}.json")),
        (ResourceType::Json, None) => dir.join(format!("{name}.json")),
        (ResourceType::Properties, Some(locale)) => dir.join(format!("{name}_{locale}.properties")),
        (ResourceType::Properties, None) => dir.join(format!("{name}.properties")),
    }
}

/// Check a locale tag such as `en`, `en_US` or `pt-BR`
#[must_use]
pub fn is_locale_tag(tag: &str) -> bool {
    let mut parts = tag.split(['_', '-']);
    let Some(language) = parts.next() else {
        return false;
    };
    (2..=3).contains(&language.len())
        && language.chars().all(|c| c.is_ascii_alphabetic())
        && parts.all(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Create a new, empty resource file and return its store
///
/// # Errors
/// Returns [`StoreError`] if the file cannot be written.
pub fn create(dir: &Path, kind: ResourceType, locale: Option<&str>, name: &str) -> Result<FileStore, StoreError> {
    let store = FileStore::new(resource_path(dir, kind, locale, name), kind, locale);
    store.write(WriteOptions::default())?;
    tracing::info!(path = %store.path().display(), "created resource");
    Ok(store)
}

/// Find the resource files of a project, unloaded
///
/// With `kind == None` every format is searched and only the format of the
/// first file found (by path order) is kept.
///
/// # Errors
/// Returns [`StoreError::Io`] if the directory cannot be read.
pub fn discover(dir: &Path, name: &str, kind: Option<ResourceType>) -> Result<Vec<FileStore>, StoreError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| StoreError::io_error(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    let wants = |candidate: ResourceType| kind.map_or(true, |k| k == candidate);
    let mut found = Vec::new();

    for entry in entries {
        let Some(file_name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if entry.is_dir() {
            let candidate = entry.join(format!("{name}.json"));
            if wants(ResourceType::Json) && is_locale_tag(file_name) && candidate.is_file() {
                found.push(FileStore::new(candidate, ResourceType::Json, Some(file_name)));
            }
        } else if wants(ResourceType::Properties) {
            if let Some(locale) = properties_locale(file_name, name) {
                found.push(FileStore::new(&entry, ResourceType::Properties, locale));
            }
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));
    if kind.is_none() {
        if let Some(first) = found.first().map(FileStore::kind) {
            found.retain(|s| s.kind == first);
        }
    }
    Ok(found)
}

/// `Some(None)` for the default file, `Some(Some(locale))` for a locale file
fn properties_locale<'a>(file_name: &'a str, name: &str) -> Option<Option<&'a str>> {
    let stem = file_name.strip_suffix(".properties")?;
    let rest = stem.strip_prefix(name)?;
    if rest.is_empty() {
        return Some(None);
    }
    let locale = rest.strip_prefix('_')?;
    is_locale_tag(locale).then_some(Some(locale))
}
