//! Editor session
//!
//! [`Editor`] owns the editor settings and at most one open [`Project`]. It
//! drives the project lifecycle (create, import, save, reload, close) and
//! exposes the key operations with string input, validated before any
//! mutation.

use std::path::{Path, PathBuf};

use lingo_keys::{ConflictPrompt, KeyPath, LeafMove};
use lingo_resource::{
    create, discover, is_locale_tag, LoadReport, ResourceSet, ResourceStore, ResourceType, WriteOptions,
    WriteReport,
};
use lingo_state::{EditorSettings, ProjectSettings, PropertyBag};

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::version::{check_for_update, ReleaseInfo, VersionSource};

/// An open translation project
#[derive(Debug)]
pub struct Project {
    dir: PathBuf,
    kind: ResourceType,
    settings: ProjectSettings,
    resources: ResourceSet,
}

impl Project {
    /// Project directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resource format
    #[must_use]
    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    /// Project settings
    #[must_use]
    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Key tree and stores
    #[must_use]
    pub fn resources(&self) -> &ResourceSet {
        &self.resources
    }

    fn write_options(&self) -> WriteOptions {
        if self.settings.minify_resources {
            WriteOptions::minified()
        } else {
            WriteOptions::default()
        }
    }
}

/// Editor session
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    settings: EditorSettings,
    project: Option<Project>,
}

impl Editor {
    /// Session with default settings, nothing read from disk
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let settings = EditorSettings {
            resource_name: config.default_resource_name.clone(),
            ..EditorSettings::default()
        };
        Self {
            config,
            settings,
            project: None,
        }
    }

    /// Session with the editor settings read from the settings file
    ///
    /// # Errors
    /// Returns [`EditorError::State`] if the settings file exists but cannot
    /// be read.
    pub fn launch(config: EditorConfig) -> Result<Self, EditorError> {
        let bag = PropertyBag::load(&config.settings_path())?;
        let defaults = Self::new(config.clone()).settings;
        let settings = EditorSettings::from_bag_or(&bag, defaults);
        tracing::debug!(path = %config.settings_path().display(), "restored editor settings");
        Ok(Self {
            config,
            settings,
            project: None,
        })
    }

    /// Reopen the most recent project, if its directory still exists
    ///
    /// The expanded and selected keys saved with the last session are
    /// restored into it.
    ///
    /// # Errors
    /// Same as [`Editor::import_project`].
    pub fn open_last_project(&mut self) -> Result<Option<LoadReport>, EditorError> {
        let Some(last) = self.settings.history.last().cloned() else {
            return Ok(None);
        };
        if !last.is_dir() {
            tracing::debug!(dir = %last.display(), "last project no longer exists");
            return Ok(None);
        }

        let expanded: Vec<KeyPath> = self
            .settings
            .last_expanded
            .iter()
            .filter_map(|k| KeyPath::parse(k).ok())
            .collect();
        let selected = self.settings.last_selected.as_deref().and_then(|k| KeyPath::parse(k).ok());

        let report = self.import_project(&last)?;
        let resources = self.resources_mut()?;
        resources.expand(&expanded);
        if let Some(selected) = selected {
            resources.select(&selected);
        }
        Ok(Some(report))
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Editor settings
    #[must_use]
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Open project
    #[must_use]
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Whether the open project has unsaved changes
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.project.as_ref().is_some_and(|p| p.resources.is_dirty())
    }

    /// Start a new project in an existing directory
    ///
    /// Properties projects get their default resource file right away.
    ///
    /// # Errors
    /// - [`EditorError::NotADirectory`] if `dir` is not a directory
    /// - [`EditorError::UnsavedChanges`] if the open project is dirty
    /// - [`EditorError::Store`] if the default resource cannot be created
    pub fn create_project(&mut self, dir: &Path, kind: ResourceType) -> Result<(), EditorError> {
        if !dir.is_dir() {
            return Err(EditorError::NotADirectory(dir.to_path_buf()));
        }
        self.close_project(false)?;

        let mut settings = ProjectSettings::from_defaults(&self.settings);
        settings.resource_type = Some(kind);
        let mut resources = ResourceSet::new();
        if kind.has_default_store() {
            let store = create(dir, kind, None, &settings.resource_name)?;
            resources.attach_store(Box::new(store))?;
            resources.mark_clean();
        }

        tracing::info!(dir = %dir.display(), %kind, "created project");
        self.project = Some(Project {
            dir: dir.to_path_buf(),
            kind,
            settings,
            resources,
        });
        self.settings.push_history(dir, self.config.history_limit);
        Ok(())
    }

    /// Open the project in a directory
    ///
    /// The resource format comes from the project settings; without one, the
    /// format of the first resource found is used. Resources that fail to
    /// load are reported, not fatal. A project whose settings name a format
    /// opens empty when it has no resources yet.
    ///
    /// # Errors
    /// - [`EditorError::NotADirectory`] if `dir` is not a directory
    /// - [`EditorError::UnsavedChanges`] if the open project is dirty
    /// - [`EditorError::EmptyProject`] if no resources were found and the
    ///   project settings name no format
    /// - [`EditorError::State`] if the project settings cannot be read
    pub fn import_project(&mut self, dir: &Path) -> Result<LoadReport, EditorError> {
        if !dir.is_dir() {
            return Err(EditorError::NotADirectory(dir.to_path_buf()));
        }
        self.close_project(false)?;

        let bag = PropertyBag::load(&self.config.project_path(dir))?;
        let mut settings = ProjectSettings::from_bag(&bag, &self.settings);

        let found = discover(dir, &settings.resource_name, settings.resource_type)?;
        let kind = match (found.first(), settings.resource_type) {
            (Some(store), _) => store.kind(),
            (None, Some(kind)) => {
                tracing::debug!(dir = %dir.display(), %kind, "project has no resources yet");
                kind
            }
            (None, None) => return Err(EditorError::EmptyProject(dir.to_path_buf())),
        };
        settings.resource_type = Some(kind);

        let mut resources = ResourceSet::new();
        let report = resources.open(found.into_iter().map(|s| Box::new(s) as Box<dyn ResourceStore>));
        for failure in &report.failed {
            tracing::warn!(store = %failure.label, error = %failure.error, "resource not loaded");
        }

        tracing::info!(dir = %dir.display(), %kind, keys = report.keys, "imported project");
        self.project = Some(Project {
            dir: dir.to_path_buf(),
            kind,
            settings,
            resources,
        });
        self.settings.push_history(dir, self.config.history_limit);
        Ok(report)
    }

    /// Write every resource and the project settings
    ///
    /// # Errors
    /// - [`EditorError::NoProject`] if no project is open
    /// - [`EditorError::State`] if the project settings cannot be written
    pub fn save_project(&mut self) -> Result<WriteReport, EditorError> {
        let project = self.project.as_mut().ok_or(EditorError::NoProject)?;
        let options = project.write_options();
        let report = project.resources.write_all(options);
        if report.is_success() {
            tracing::info!(dir = %project.dir.display(), stores = report.written.len(), "saved project");
        }
        self.store_project_state()?;
        Ok(report)
    }

    /// Discard unsaved changes and read the project again
    ///
    /// # Errors
    /// Same as [`Editor::import_project`], or [`EditorError::NoProject`].
    pub fn reload_project(&mut self) -> Result<LoadReport, EditorError> {
        let dir = self.project.as_ref().ok_or(EditorError::NoProject)?.dir.clone();
        if let Some(project) = self.project.as_mut() {
            project.resources.mark_clean();
        }
        self.import_project(&dir)
    }

    /// Close the open project, remembering its state
    ///
    /// With `save` the resources are written first. Returns the write report
    /// when a save happened. Closing without a project is a no-op.
    ///
    /// # Errors
    /// - [`EditorError::UnsavedChanges`] if the project is dirty and `save`
    ///   is false
    /// - [`EditorError::State`] if the settings cannot be written
    pub fn close_project(&mut self, save: bool) -> Result<Option<WriteReport>, EditorError> {
        if self.project.is_none() {
            return Ok(None);
        }

        let report = if save {
            Some(self.save_project()?)
        } else if self.is_dirty() {
            return Err(EditorError::UnsavedChanges);
        } else {
            None
        };

        self.store_project_state()?;
        self.store_editor_state()?;
        if let Some(project) = self.project.take() {
            tracing::info!(dir = %project.dir.display(), "closed project");
        }
        Ok(report)
    }

    /// Add a locale resource to the open project
    ///
    /// # Errors
    /// - [`EditorError::InvalidLocale`] if `locale` is not a locale tag
    /// - [`EditorError::NoProject`] if no project is open
    /// - [`EditorError::Sync`] if the locale is already present
    /// - [`EditorError::Store`] if the resource file cannot be created
    pub fn add_locale(&mut self, locale: &str) -> Result<(), EditorError> {
        let locale = locale.trim();
        if !is_locale_tag(locale) {
            return Err(EditorError::InvalidLocale(locale.to_string()));
        }
        let project = self.project.as_mut().ok_or(EditorError::NoProject)?;
        if project.resources.store(Some(locale)).is_some() {
            return Err(lingo_resource::SyncError::DuplicateLocale(locale.to_string()).into());
        }

        let store = create(&project.dir, project.kind, Some(locale), &project.settings.resource_name)?;
        project.resources.attach_store(Box::new(store))?;
        Ok(())
    }

    /// Add a translation key and select it; `false` if it already existed
    ///
    /// # Errors
    /// [`EditorError::Key`] for a malformed key, [`EditorError::NoProject`].
    pub fn add_key(&mut self, key: &str) -> Result<bool, EditorError> {
        let path = KeyPath::parse(key)?;
        let resources = self.resources_mut()?;
        let added = resources.add_key(&path);
        resources.select(&path);
        Ok(added)
    }

    /// Remove a key; a group of keys is removed with everything below it
    ///
    /// # Errors
    /// [`EditorError::Key`] for a malformed key, [`EditorError::NoProject`].
    pub fn remove_key(&mut self, key: &str) -> Result<Vec<KeyPath>, EditorError> {
        let path = KeyPath::parse(key)?;
        Ok(self.resources_mut()?.remove_key(&path))
    }

    /// Rename a key; `confirm` is asked when the new key already exists
    ///
    /// # Errors
    /// [`EditorError::Key`] for malformed keys, [`EditorError::Sync`] for a
    /// rejected or declined rename, [`EditorError::NoProject`].
    pub fn rename_key<F>(&mut self, from: &str, to: &str, confirm: F) -> Result<Vec<LeafMove>, EditorError>
    where
        F: FnOnce(&ConflictPrompt) -> bool,
    {
        let (from, to) = (KeyPath::parse(from)?, KeyPath::parse(to)?);
        Ok(self.resources_mut()?.rename_key(&from, &to, confirm)?)
    }

    /// Duplicate a key; `confirm` is asked when the new key already exists
    ///
    /// # Errors
    /// Same as [`Editor::rename_key`].
    pub fn duplicate_key<F>(&mut self, from: &str, to: &str, confirm: F) -> Result<Vec<LeafMove>, EditorError>
    where
        F: FnOnce(&ConflictPrompt) -> bool,
    {
        let (from, to) = (KeyPath::parse(from)?, KeyPath::parse(to)?);
        Ok(self.resources_mut()?.duplicate_key(&from, &to, confirm)?)
    }

    /// Set the text of a key in one locale
    ///
    /// # Errors
    /// [`EditorError::Key`], [`EditorError::Sync`] for an unknown key or
    /// locale, [`EditorError::NoProject`].
    pub fn set_translation(&mut self, key: &str, locale: Option<&str>, text: &str) -> Result<bool, EditorError> {
        let path = KeyPath::parse(key)?;
        Ok(self.resources_mut()?.set_translation(&path, locale, text)?)
    }

    /// Select the node of a key, if it exists
    pub fn find_key(&mut self, key: &str) -> Option<KeyPath> {
        let path = KeyPath::parse(key).ok()?;
        let resources = self.project.as_mut().map(|p| &mut p.resources)?;
        resources.select(&path).then_some(path)
    }

    fn resources_mut(&mut self) -> Result<&mut ResourceSet, EditorError> {
        self.project
            .as_mut()
            .map(|p| &mut p.resources)
            .ok_or(EditorError::NoProject)
    }

    /// Look for a newer release if enabled in the settings
    pub async fn check_version(&self, source: &dyn VersionSource) -> Option<ReleaseInfo> {
        if !self.settings.check_version {
            return None;
        }
        check_for_update(source, &self.config.current_version, self.config.version_check_timeout()).await
    }

    /// Write the editor settings, including the open project's expanded and
    /// selected keys
    ///
    /// # Errors
    /// Returns [`EditorError::State`] if the settings file cannot be written.
    pub fn store_editor_state(&mut self) -> Result<(), EditorError> {
        if let Some(project) = &self.project {
            let tree = project.resources.tree();
            self.settings.last_expanded = tree.expanded().map(ToString::to_string).collect();
            self.settings.last_selected = tree.selected().map(ToString::to_string);
        }

        let mut bag = PropertyBag::new();
        self.settings.to_bag(&mut bag);
        bag.store(&self.config.settings_path())?;
        Ok(())
    }

    fn store_project_state(&self) -> Result<(), EditorError> {
        let Some(project) = &self.project else {
            return Ok(());
        };
        let mut bag = PropertyBag::new();
        project.settings.to_bag(&mut bag);
        bag.store(&self.config.project_path(&project.dir))?;
        Ok(())
    }
}
