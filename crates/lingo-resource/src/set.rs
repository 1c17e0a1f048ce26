//! Synchronization engine
//!
//! [`ResourceSet`] owns the key tree and one store per locale and keeps
//! them in lockstep: every leaf of the tree is present (possibly empty) in
//! every store, and every store key is a leaf of the tree. All structural
//! mutations go through this type.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use lingo_keys::{Conflict, ConflictPrompt, ConflictResolver, KeyPath, KeyTree, LeafMove};

use crate::codec::WriteOptions;
use crate::error::{locale_label, StoreError, SyncError};
use crate::store::ResourceStore;

/// Callback receiving [`ChangeEvent`]s
pub type Listener = Box<dyn FnMut(&ChangeEvent) + Send>;

/// Notification emitted after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Stores were (re)loaded
    Loaded {
        /// Number of leaf keys after the load
        keys: usize,
    },
    /// A new leaf key was added
    KeyAdded(KeyPath),
    /// Leaf keys were removed
    KeysRemoved(Vec<KeyPath>),
    /// A key subtree was moved
    KeyRenamed {
        /// Old key
        from: KeyPath,
        /// New key
        to: KeyPath,
        /// How the destination was resolved
        conflict: Conflict,
    },
    /// A key subtree was copied
    KeyDuplicated {
        /// Copied key
        from: KeyPath,
        /// New key
        to: KeyPath,
        /// How the destination was resolved
        conflict: Conflict,
    },
    /// One store's text for a key changed
    TranslationChanged {
        /// Edited key
        key: KeyPath,
        /// Locale of the edited store
        locale: Option<String>,
    },
    /// A store joined the set
    StoreAttached {
        /// Locale of the store
        locale: Option<String>,
    },
    /// A store left the set
    StoreDetached {
        /// Locale of the store
        locale: Option<String>,
    },
    /// Every store was written
    Saved,
}

/// Store that failed to load or write
#[derive(Debug)]
pub struct StoreFailure {
    /// Store label
    pub label: String,
    /// Store locale
    pub locale: Option<String>,
    /// Cause
    pub error: StoreError,
}

/// Outcome of [`ResourceSet::load`] and [`ResourceSet::open`]
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Leaf keys in the tree
    pub keys: usize,
    /// Store entries filled with `""`
    pub backfilled: usize,
    /// Store keys dropped because they are not valid keys, as `label: key`
    pub rejected: Vec<String>,
    /// Stores skipped because their locale was already taken
    pub duplicates: Vec<String>,
    /// Stores that failed to load and were left out
    pub failed: Vec<StoreFailure>,
}

impl LoadReport {
    /// Whether every store was taken in unchanged
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.duplicates.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of [`ResourceSet::write_all`]
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Labels of the stores written
    pub written: Vec<String>,
    /// Stores that failed
    pub failed: Vec<StoreFailure>,
}

impl WriteReport {
    /// Whether every store was written
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Key tree plus the locale stores it is synchronized with
#[derive(Default)]
pub struct ResourceSet {
    tree: KeyTree,
    stores: Vec<Box<dyn ResourceStore>>,
    dirty: bool,
    listeners: Vec<Listener>,
}

impl Debug for ResourceSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSet")
            .field("tree", &self.tree)
            .field("stores", &self.stores.iter().map(|s| s.label()).collect::<Vec<_>>())
            .field("dirty", &self.dirty)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ResourceSet {
    /// Empty set without stores
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content with the given stores, as they are in memory
    ///
    /// The tree becomes the union of all store keys, in sorted key order,
    /// and every store is back-filled with `""` for the keys it lacks. The
    /// set is clean afterwards.
    pub fn load<I>(&mut self, stores: I) -> LoadReport
    where
        I: IntoIterator<Item = Box<dyn ResourceStore>>,
    {
        let mut report = LoadReport::default();
        self.tree.clear();
        self.stores.clear();

        for store in stores {
            if self.position(store.locale()).is_some() {
                tracing::warn!(store = %store.label(), "skipping store for an already loaded locale");
                report.duplicates.push(store.label());
                continue;
            }
            self.stores.push(store);
        }

        let mut union = BTreeMap::new();
        for store in &mut self.stores {
            for (key, path) in valid_keys(store.as_mut(), &mut report.rejected) {
                union.entry(key).or_insert(path);
            }
        }
        for path in union.values() {
            self.tree.insert(path);
        }

        report.backfilled = self.backfill();
        report.keys = self.tree.leaf_count();
        self.dirty = false;

        tracing::info!(
            stores = self.stores.len(),
            keys = report.keys,
            backfilled = report.backfilled,
            "loaded resources"
        );
        self.emit(&ChangeEvent::Loaded { keys: report.keys });
        report
    }

    /// Read every store from its backing data, then [`load`](Self::load)
    ///
    /// Stores that fail to read are left out and reported; the others are
    /// loaded normally.
    pub fn open<I>(&mut self, stores: I) -> LoadReport
    where
        I: IntoIterator<Item = Box<dyn ResourceStore>>,
    {
        let mut failed = Vec::new();
        let mut readable = Vec::new();
        for mut store in stores {
            match store.load() {
                Ok(()) => readable.push(store),
                Err(error) => {
                    tracing::warn!(store = %store.label(), %error, "failed to load store");
                    failed.push(StoreFailure {
                        label: store.label(),
                        locale: store.locale().map(str::to_string),
                        error,
                    });
                }
            }
        }

        let mut report = self.load(readable);
        report.failed = failed;
        report
    }

    /// Drop every key and store
    pub fn clear(&mut self) {
        self.tree.clear();
        self.stores.clear();
        self.dirty = false;
    }

    /// Add a leaf key to the tree and to every store
    ///
    /// Returns `false`, and changes nothing, if the key already exists.
    pub fn add_key(&mut self, path: &KeyPath) -> bool {
        if self.tree.contains_leaf(path) {
            return false;
        }

        self.tree.insert(path);
        let key = path.to_string();
        for store in &mut self.stores {
            if !store.contains(&key) {
                store.set(&key, String::new());
            }
        }

        tracing::debug!(%path, "added key");
        self.touch(&ChangeEvent::KeyAdded(path.clone()));
        true
    }

    /// Remove a key from the tree and every store
    ///
    /// A leaf key keeps its descendants; a structural key takes its whole
    /// subtree. Returns the removed leaf keys; a missing path is a no-op.
    pub fn remove_key(&mut self, path: &KeyPath) -> Vec<KeyPath> {
        let removed = self.tree.remove(path);
        if removed.is_empty() {
            return removed;
        }

        for store in &mut self.stores {
            for leaf in &removed {
                store.remove(&leaf.to_string());
            }
        }

        tracing::debug!(%path, leaves = removed.len(), "removed key");
        self.touch(&ChangeEvent::KeysRemoved(removed.clone()));
        removed
    }

    /// Move a key subtree to a new key, in the tree and every store
    ///
    /// When the destination exists, `confirm` is asked once with the
    /// classified conflict; declining aborts without changes.
    ///
    /// # Errors
    /// - [`SyncError::Key`] if the source is missing or the paths overlap
    /// - [`SyncError::ConflictUnconfirmed`] if `confirm` returned `false`
    pub fn rename_key<F>(&mut self, from: &KeyPath, to: &KeyPath, confirm: F) -> Result<Vec<LeafMove>, SyncError>
    where
        F: FnOnce(&ConflictPrompt) -> bool,
    {
        self.relocate(from, to, confirm, false)
    }

    /// Copy a key subtree to a new key, in the tree and every store
    ///
    /// Same conflict handling as [`rename_key`](Self::rename_key).
    ///
    /// # Errors
    /// Same as [`rename_key`](Self::rename_key).
    pub fn duplicate_key<F>(&mut self, from: &KeyPath, to: &KeyPath, confirm: F) -> Result<Vec<LeafMove>, SyncError>
    where
        F: FnOnce(&ConflictPrompt) -> bool,
    {
        self.relocate(from, to, confirm, true)
    }

    fn relocate<F>(&mut self, from: &KeyPath, to: &KeyPath, confirm: F, keep_source: bool) -> Result<Vec<LeafMove>, SyncError>
    where
        F: FnOnce(&ConflictPrompt) -> bool,
    {
        let conflict = ConflictResolver::inspect(&self.tree, from, to)?;
        if let Some(prompt) = ConflictResolver::prompt(conflict, from, to) {
            if !confirm(&prompt) {
                tracing::debug!(%from, %to, %conflict, "conflict declined");
                return Err(SyncError::ConflictUnconfirmed {
                    conflict,
                    source_key: from.to_string(),
                    destination: to.to_string(),
                });
            }
        }

        let moves = if keep_source {
            self.tree.duplicate(from, to, conflict)?
        } else {
            self.tree.rename(from, to, conflict)?
        };
        if moves.is_empty() {
            return Ok(moves);
        }

        for store in &mut self.stores {
            apply_moves(store.as_mut(), to, &moves, conflict, keep_source);
        }

        let event = if keep_source {
            ChangeEvent::KeyDuplicated {
                from: from.clone(),
                to: to.clone(),
                conflict,
            }
        } else {
            ChangeEvent::KeyRenamed {
                from: from.clone(),
                to: to.clone(),
                conflict,
            }
        };
        self.touch(&event);
        Ok(moves)
    }

    /// Add a store to the set
    ///
    /// Keys only known to the new store join the tree and are back-filled
    /// into the other stores; the new store is back-filled with every
    /// existing key. Returns the number of keys the tree gained.
    ///
    /// # Errors
    /// Returns [`SyncError::DuplicateLocale`] if the locale is already present.
    pub fn attach_store(&mut self, mut store: Box<dyn ResourceStore>) -> Result<usize, SyncError> {
        if self.position(store.locale()).is_some() {
            return Err(SyncError::DuplicateLocale(locale_label(store.locale())));
        }

        let mut rejected = Vec::new();
        let mut added = 0;
        for (_, path) in valid_keys(store.as_mut(), &mut rejected) {
            if !self.tree.contains_leaf(&path) {
                self.tree.insert(&path);
                added += 1;
            }
        }

        let locale = store.locale().map(str::to_string);
        self.stores.push(store);
        let backfilled = self.backfill();

        tracing::info!(locale = %locale_label(locale.as_deref()), added, backfilled, "attached store");
        self.touch(&ChangeEvent::StoreAttached { locale });
        Ok(added)
    }

    /// Remove the store of a locale from the set; the tree is left as is
    ///
    /// # Errors
    /// Returns [`SyncError::UnknownLocale`] if no store has this locale.
    pub fn detach_store(&mut self, locale: Option<&str>) -> Result<Box<dyn ResourceStore>, SyncError> {
        let index = self
            .position(locale)
            .ok_or_else(|| SyncError::UnknownLocale(locale_label(locale)))?;
        let store = self.stores.remove(index);

        tracing::info!(locale = %locale_label(locale), "detached store");
        self.emit(&ChangeEvent::StoreDetached {
            locale: locale.map(str::to_string),
        });
        Ok(store)
    }

    /// Attached stores, in attach order
    #[inline]
    #[must_use]
    pub fn stores(&self) -> &[Box<dyn ResourceStore>] {
        &self.stores
    }

    /// Store of a locale
    #[must_use]
    pub fn store(&self, locale: Option<&str>) -> Option<&dyn ResourceStore> {
        let index = self.position(locale)?;
        Some(self.stores[index].as_ref())
    }

    /// Locales of the attached stores
    #[must_use]
    pub fn locales(&self) -> Vec<Option<&str>> {
        self.stores.iter().map(|s| s.locale()).collect()
    }

    fn position(&self, locale: Option<&str>) -> Option<usize> {
        self.stores.iter().position(|s| s.locale() == locale)
    }

    /// Text of a key in one locale
    #[must_use]
    pub fn translation(&self, path: &KeyPath, locale: Option<&str>) -> Option<&str> {
        self.store(locale).and_then(|s| s.get(&path.to_string()))
    }

    /// Text of a key in every locale, in store order
    #[must_use]
    pub fn translations(&self, path: &KeyPath) -> Vec<(Option<&str>, &str)> {
        let key = path.to_string();
        self.stores
            .iter()
            .filter_map(|s| s.get(&key).map(|text| (s.locale(), text)))
            .collect()
    }

    /// Set the text of an existing key in one locale
    ///
    /// Returns whether the stored text changed.
    ///
    /// # Errors
    /// - [`SyncError::NotALeaf`] if the key is not a leaf of the tree
    /// - [`SyncError::UnknownLocale`] if no store has this locale
    pub fn set_translation(&mut self, path: &KeyPath, locale: Option<&str>, text: &str) -> Result<bool, SyncError> {
        if !self.tree.contains_leaf(path) {
            return Err(SyncError::NotALeaf(path.to_string()));
        }
        let index = self
            .position(locale)
            .ok_or_else(|| SyncError::UnknownLocale(locale_label(locale)))?;

        let key = path.to_string();
        let store = &mut self.stores[index];
        if store.get(&key) == Some(text) {
            return Ok(false);
        }
        store.set(&key, text.to_string());

        self.touch(&ChangeEvent::TranslationChanged {
            key: path.clone(),
            locale: locale.map(str::to_string),
        });
        Ok(true)
    }

    /// Write every store
    ///
    /// A failing store does not stop the others. The set becomes clean only
    /// if every write succeeded.
    pub fn write_all(&mut self, options: WriteOptions) -> WriteReport {
        let mut report = WriteReport::default();
        for store in &self.stores {
            match store.write(options) {
                Ok(()) => report.written.push(store.label()),
                Err(error) => {
                    tracing::warn!(store = %store.label(), %error, "failed to write store");
                    report.failed.push(StoreFailure {
                        label: store.label(),
                        locale: store.locale().map(str::to_string),
                        error,
                    });
                }
            }
        }

        if report.is_success() {
            self.dirty = false;
            self.emit(&ChangeEvent::Saved);
        }
        report
    }

    /// Whether there are changes not yet written
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget pending changes without writing
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// The key tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &KeyTree {
        &self.tree
    }

    /// Mark paths as expanded, returning how many exist
    pub fn expand<'p, I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = &'p KeyPath>,
    {
        self.tree.expand(paths)
    }

    /// Collapse a path
    pub fn collapse(&mut self, path: &KeyPath) -> bool {
        self.tree.collapse(path)
    }

    /// Select an existing path
    pub fn select(&mut self, path: &KeyPath) -> bool {
        self.tree.select(path)
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.tree.clear_selection();
    }

    /// Check that every leaf is in every store and every store key is a leaf
    #[must_use]
    pub fn is_synchronized(&self) -> bool {
        let leaves: Vec<String> = self.tree.leaf_paths().iter().map(ToString::to_string).collect();
        self.stores.iter().all(|store| {
            let mut keys = store.keys();
            keys.sort();
            let mut expected = leaves.clone();
            expected.sort();
            keys == expected
        })
    }

    /// Register a listener for [`ChangeEvent`]s
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn touch(&mut self, event: &ChangeEvent) {
        self.dirty = true;
        self.emit(event);
    }

    fn emit(&mut self, event: &ChangeEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Fill `""` into every store lacking a leaf key
    fn backfill(&mut self) -> usize {
        let leaves = self.tree.leaf_paths();
        let mut filled = 0;
        for store in &mut self.stores {
            for leaf in &leaves {
                let key = leaf.to_string();
                if !store.contains(&key) {
                    store.set(&key, String::new());
                    filled += 1;
                }
            }
        }
        filled
    }
}

/// Valid keys of a store; invalid ones are removed from it and reported
fn valid_keys(store: &mut dyn ResourceStore, rejected: &mut Vec<String>) -> Vec<(String, KeyPath)> {
    let mut valid = Vec::new();
    for key in store.keys() {
        match KeyPath::parse(&key) {
            Ok(path) if path.to_string() == key => valid.push((key, path)),
            _ => {
                tracing::warn!(store = %store.label(), %key, "dropping invalid key");
                store.remove(&key);
                rejected.push(format!("{}: {key}", store.label()));
            }
        }
    }
    valid
}

/// Mirror a tree rename/duplicate in one store
fn apply_moves(store: &mut dyn ResourceStore, to: &KeyPath, moves: &[LeafMove], conflict: Conflict, keep_source: bool) {
    let values: Vec<Option<String>> = moves
        .iter()
        .map(|mv| store.get(&mv.from.to_string()).map(str::to_string))
        .collect();

    if conflict == Conflict::Replace {
        let root = to.to_string();
        let nested = format!("{root}.");
        for key in store.keys() {
            if key == root || key.starts_with(&nested) {
                store.remove(&key);
            }
        }
    }

    for (mv, value) in moves.iter().zip(values) {
        let destination = mv.to.to_string();
        let value = value.unwrap_or_default();
        if !store.contains(&destination) || !value.is_empty() {
            store.set(&destination, value);
        }
    }

    if !keep_source {
        for mv in moves {
            store.remove(&mv.from.to_string());
        }
    }
}
