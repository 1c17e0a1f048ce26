//! Testing utilities for the Lingo workspace
//!
//! Shared test helpers, fixtures, and stores.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use lingo_keys::KeyPath;
use lingo_resource::{
    resource_path, MemoryStore, ResourceSet, ResourceStore, ResourceType, StoreError, WriteOptions,
};

pub fn key(s: &str) -> KeyPath {
    KeyPath::parse(s).unwrap()
}

pub fn memory_store(locale: &str, pairs: &[(&str, &str)]) -> Box<dyn ResourceStore> {
    Box::new(MemoryStore::with_translations(Some(locale), pairs.iter().copied()))
}

pub fn loaded_set(stores: Vec<Box<dyn ResourceStore>>) -> ResourceSet {
    let mut set = ResourceSet::new();
    set.load(stores);
    set
}

/// Three locales sharing part of their keys
pub fn three_locale_set() -> ResourceSet {
    loaded_set(vec![
        memory_store("en", &[("a.b", "en-ab"), ("c", "en-c")]),
        memory_store("nl", &[("a.b", "nl-ab"), ("d.e", "nl-de")]),
        memory_store("fr", &[("f", "")]),
    ])
}

/// Write a resource file for one locale with the given content
pub fn write_resource(dir: &Path, kind: ResourceType, locale: Option<&str>, name: &str, content: &str) {
    let path = resource_path(dir, kind, locale, name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// JSON project with `en` and `nl` resources
pub fn write_json_project(dir: &Path, name: &str) {
    write_resource(
        dir,
        ResourceType::Json,
        Some("en"),
        name,
        r#"{"menu": {"open": "Open", "close": "Close"}, "title": "Editor"}"#,
    );
    write_resource(dir, ResourceType::Json, Some("nl"), name, r#"{"menu": {"open": "Openen"}}"#);
}

/// Properties project with a default and an `en` resource
pub fn write_properties_project(dir: &Path, name: &str) {
    write_resource(dir, ResourceType::Properties, None, name, "greeting=Hello\n");
    write_resource(dir, ResourceType::Properties, Some("en"), name, "greeting=Hello\nfarewell=Bye\n");
}

/// Store whose writes always fail
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
}

impl FailingStore {
    pub fn new(locale: &str) -> Self {
        Self {
            inner: MemoryStore::new(Some(locale)),
        }
    }
}

impl ResourceStore for FailingStore {
    fn locale(&self) -> Option<&str> {
        self.inner.locale()
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        self.inner.set(key, value);
    }

    fn remove(&mut self, key: &str) -> Option<String> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    fn load(&mut self) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("load".into()))
    }

    fn write(&self, _options: WriteOptions) -> Result<(), StoreError> {
        Err(StoreError::Unsupported("write".into()))
    }
}
