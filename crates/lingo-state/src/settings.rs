//! Editor-wide and per-project settings
//!
//! Both are persisted through a [`PropertyBag`]; unknown or unreadable
//! entries fall back to defaults.

use std::path::{Path, PathBuf};

use lingo_resource::ResourceType;

use crate::bag::{or_default, PropertyBag};

/// Default base name of resource files
pub const DEFAULT_RESOURCE_NAME: &str = "translations";

/// Default number of remembered projects
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

const HISTORY: &str = "history";
const LAST_EXPANDED: &str = "last_expanded";
const LAST_SELECTED: &str = "last_selected";
const MINIFY_RESOURCES: &str = "minify_resources";
const RESOURCE_NAME: &str = "resource_name";
const RESOURCE_TYPE: &str = "resource_type";
const CHECK_VERSION: &str = "check_version";

/// Settings shared by every project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    /// Recently opened project directories, most recent last
    pub history: Vec<PathBuf>,
    /// Keys expanded when the editor was last closed
    pub last_expanded: Vec<String>,
    /// Key selected when the editor was last closed
    pub last_selected: Option<String>,
    /// Default for new projects
    pub minify_resources: bool,
    /// Default for new projects
    pub resource_name: String,
    /// Look for a newer release on startup
    pub check_version: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history: Vec::new(),
            last_expanded: Vec::new(),
            last_selected: None,
            minify_resources: false,
            resource_name: DEFAULT_RESOURCE_NAME.to_string(),
            check_version: true,
        }
    }
}

impl EditorSettings {
    /// Read settings from a bag
    #[must_use]
    pub fn from_bag(bag: &PropertyBag) -> Self {
        Self::from_bag_or(bag, Self::default())
    }

    /// Read settings from a bag, with `defaults` for missing entries
    #[must_use]
    pub fn from_bag_or(bag: &PropertyBag, defaults: Self) -> Self {
        Self {
            history: bag.get_list(HISTORY).into_iter().map(PathBuf::from).collect(),
            last_expanded: bag.get_list(LAST_EXPANDED),
            last_selected: bag
                .get_string(LAST_SELECTED)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            minify_resources: or_default(bag.get_bool(MINIFY_RESOURCES), defaults.minify_resources),
            resource_name: bag
                .get_string(RESOURCE_NAME)
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.resource_name, str::to_string),
            check_version: or_default(bag.get_bool(CHECK_VERSION), defaults.check_version),
        }
    }

    /// Write settings into a bag
    pub fn to_bag(&self, bag: &mut PropertyBag) {
        bag.set_list(HISTORY, self.history.iter().map(|p| p.to_string_lossy()));
        bag.set_list(LAST_EXPANDED, &self.last_expanded);
        bag.set_string(LAST_SELECTED, self.last_selected.clone().unwrap_or_default());
        bag.set_bool(MINIFY_RESOURCES, self.minify_resources);
        bag.set_string(RESOURCE_NAME, self.resource_name.as_str());
        bag.set_bool(CHECK_VERSION, self.check_version);
    }

    /// Record a project directory as most recent
    ///
    /// An existing entry moves to the end; the oldest entries are dropped
    /// beyond `limit`.
    pub fn push_history(&mut self, dir: &Path, limit: usize) {
        self.history.retain(|p| p != dir);
        self.history.push(dir.to_path_buf());
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Forget a project directory
    pub fn remove_history(&mut self, dir: &Path) {
        self.history.retain(|p| p != dir);
    }
}

/// Settings stored with one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Write resources without indentation
    pub minify_resources: bool,
    /// Base name of resource files
    pub resource_name: String,
    /// Resource format, `None` until the project has resources
    pub resource_type: Option<ResourceType>,
}

impl ProjectSettings {
    /// Settings for a new project, seeded from the editor defaults
    #[must_use]
    pub fn from_defaults(editor: &EditorSettings) -> Self {
        Self {
            minify_resources: editor.minify_resources,
            resource_name: editor.resource_name.clone(),
            resource_type: None,
        }
    }

    /// Read settings from a bag, falling back to the editor defaults
    #[must_use]
    pub fn from_bag(bag: &PropertyBag, editor: &EditorSettings) -> Self {
        let defaults = Self::from_defaults(editor);
        Self {
            minify_resources: or_default(bag.get_bool(MINIFY_RESOURCES), defaults.minify_resources),
            resource_name: bag
                .get_string(RESOURCE_NAME)
                .filter(|s| !s.trim().is_empty())
                .map_or(defaults.resource_name, str::to_string),
            resource_type: or_default(bag.get_enum::<ResourceType>(RESOURCE_TYPE).map(|t| t.map(Some)), None),
        }
    }

    /// Write settings into a bag
    pub fn to_bag(&self, bag: &mut PropertyBag) {
        bag.set_bool(MINIFY_RESOURCES, self.minify_resources);
        bag.set_string(RESOURCE_NAME, self.resource_name.as_str());
        match self.resource_type {
            Some(kind) => bag.set_enum(RESOURCE_TYPE, &kind),
            None => {
                bag.remove(RESOURCE_TYPE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn history_is_bounded_and_deduplicated() {
        let mut settings = EditorSettings::default();
        for dir in ["/a", "/b", "/c"] {
            settings.push_history(Path::new(dir), 3);
        }
        settings.push_history(Path::new("/a"), 3);
        assert_eq!(settings.history, vec![PathBuf::from("/b"), "/c".into(), "/a".into()]);

        settings.push_history(Path::new("/d"), 3);
        assert_eq!(settings.history, vec![PathBuf::from("/c"), "/a".into(), "/d".into()]);
    }

    #[test]
    fn editor_settings_bag_round_trip() {
        let settings = EditorSettings {
            history: vec!["/p/one".into(), "/p/two".into()],
            last_expanded: vec!["menu".into(), "menu.file".into()],
            last_selected: Some("menu.file.open".into()),
            minify_resources: true,
            resource_name: "messages".into(),
            check_version: false,
        };
        let mut bag = PropertyBag::new();
        settings.to_bag(&mut bag);
        assert_eq!(EditorSettings::from_bag(&bag), settings);
    }

    #[test]
    fn editor_settings_defaults_for_empty_or_bad_bag() {
        let mut bag = PropertyBag::new();
        bag.set_string(CHECK_VERSION, "maybe");
        bag.set_string(LAST_SELECTED, "");
        let settings = EditorSettings::from_bag(&bag);
        assert_eq!(settings, EditorSettings::default());
    }

    #[test]
    fn project_settings_fall_back_to_editor_defaults() {
        let editor = EditorSettings {
            minify_resources: true,
            resource_name: "messages".into(),
            ..EditorSettings::default()
        };
        let project = ProjectSettings::from_bag(&PropertyBag::new(), &editor);
        assert_eq!(project, ProjectSettings::from_defaults(&editor));
        assert_eq!(project.resource_type, None);
    }

    #[test]
    fn project_settings_bag_round_trip() {
        let project = ProjectSettings {
            minify_resources: false,
            resource_name: "translations".into(),
            resource_type: Some(ResourceType::Json),
        };
        let mut bag = PropertyBag::new();
        project.to_bag(&mut bag);
        assert_eq!(bag.get_string(RESOURCE_TYPE), Some("JSON"));
        assert_eq!(ProjectSettings::from_bag(&bag, &EditorSettings::default()), project);
    }
}
