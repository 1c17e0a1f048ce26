//! End-to-end tests of the editor session against real project directories.
//!
//! Core guarantees exercised here:
//! - Importing discovers resources, builds the key tree and back-fills.
//! - Saving writes every resource and the project settings; state survives
//!   a close/launch cycle (history, expanded and selected keys).
//! - Lifecycle misuse is reported as errors instead of losing changes.

use lingo_editor::{Editor, EditorConfig, EditorError, ReleaseInfo, VersionError, VersionSource};
use lingo_keys::KeyPath;
use lingo_resource::ResourceType;
use lingo_test_utils::{key, write_json_project, write_properties_project};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config(settings_dir: &Path) -> EditorConfig {
    EditorConfig::default().with_settings_dir(settings_dir)
}

/// Import, edit, save and re-import a JSON project.
#[test]
fn json_project_edit_and_save() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    let report = editor.import_project(project.path()).unwrap();
    assert_eq!(report.keys, 3);
    assert_eq!(editor.project().unwrap().kind(), ResourceType::Json);

    editor.rename_key("menu", "actions", |_| true).unwrap();
    editor.set_translation("title", Some("nl"), "Bewerker").unwrap();
    assert!(editor.is_dirty());

    let written = editor.save_project().unwrap();
    assert!(written.is_success());
    assert_eq!(written.written.len(), 2);
    assert!(!editor.is_dirty());
    assert!(project.path().join(".lingo-project").is_file());

    editor.close_project(false).unwrap();
    editor.import_project(project.path()).unwrap();
    let resources = editor.project().unwrap().resources();
    assert_eq!(resources.translation(&key("actions.open"), Some("nl")), Some("Openen"));
    assert_eq!(resources.translation(&key("title"), Some("nl")), Some("Bewerker"));
    assert!(resources.tree().find(&key("menu")).is_none());
}

/// Expanded and selected keys and the project history survive a restart.
#[test]
fn session_state_survives_relaunch() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();
    assert_eq!(editor.find_key("menu.open"), Some(key("menu.open")));
    editor.close_project(false).unwrap();

    let mut relaunched = Editor::launch(config(settings.path())).unwrap();
    assert_eq!(relaunched.settings().history, vec![project.path().to_path_buf()]);
    assert_eq!(relaunched.settings().last_selected.as_deref(), Some("menu.open"));

    relaunched.open_last_project().unwrap().unwrap();
    let tree = relaunched.project().unwrap().resources().tree();
    assert_eq!(tree.selected(), Some(&key("menu.open")));
}

/// The stored resource type limits discovery on the next import.
#[test]
fn project_settings_pin_resource_type() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_properties_project(project.path(), "translations");
    write_json_project(project.path(), "translations");

    fs::write(project.path().join(".lingo-project"), "resource_type = \"Properties\"\n").unwrap();

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();

    let project = editor.project().unwrap();
    assert_eq!(project.kind(), ResourceType::Properties);
    assert_eq!(project.resources().locales(), vec![None, Some("en")]);
}

/// Minified projects are written without indentation.
#[test]
fn minified_project_writes_compact_json() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");
    fs::write(project.path().join(".lingo-project"), "minify_resources = \"true\"\n").unwrap();

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();
    editor.remove_key("menu").unwrap();
    editor.save_project().unwrap();

    let en = fs::read_to_string(project.path().join("en/translations.json")).unwrap();
    assert_eq!(en, r#"{"title":"Editor"}"#);
}

/// A new JSON project has no resource files yet but can be reopened, and
/// gains them once a locale is added.
#[test]
fn new_json_project_reopens_empty() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.create_project(project.path(), ResourceType::Json).unwrap();
    editor.close_project(false).unwrap();

    let report = editor.import_project(project.path()).unwrap();
    assert_eq!(report.keys, 0);
    assert_eq!(editor.project().unwrap().kind(), ResourceType::Json);
    assert!(editor.project().unwrap().resources().locales().is_empty());

    editor.add_locale("en").unwrap();
    editor.add_key("greeting").unwrap();
    editor.close_project(true).unwrap();

    let report = editor.import_project(project.path()).unwrap();
    assert_eq!(report.keys, 1);
    assert_eq!(editor.project().unwrap().resources().locales(), vec![Some("en")]);
}

/// Saved expanded and selected keys belong to the last project only.
#[test]
fn session_state_is_not_applied_to_other_projects() {
    let settings = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_json_project(first.path(), "translations");
    write_json_project(second.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(first.path()).unwrap();
    editor.find_key("menu.open").unwrap();
    editor.close_project(false).unwrap();

    let mut relaunched = Editor::launch(config(settings.path())).unwrap();
    relaunched.import_project(second.path()).unwrap();
    assert_eq!(relaunched.project().unwrap().resources().tree().selected(), None);
}

/// Reload throws away unsaved edits.
#[test]
fn reload_discards_changes() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();
    editor.add_key("draft").unwrap();

    editor.reload_project().unwrap();
    assert!(!editor.is_dirty());
    assert!(editor.project().unwrap().resources().tree().find(&key("draft")).is_none());
}

#[test]
fn import_errors() {
    let settings = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    let mut editor = Editor::launch(config(settings.path())).unwrap();

    assert!(matches!(
        editor.import_project(empty.path()),
        Err(EditorError::EmptyProject(_))
    ));
    assert!(matches!(
        editor.import_project(&empty.path().join("missing")),
        Err(EditorError::NotADirectory(_))
    ));
    assert!(editor.project().is_none());
}

/// Adding a locale creates its file and fills it with every key.
#[test]
fn add_locale_backfills_new_resource() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();
    editor.add_locale("de").unwrap();
    editor.save_project().unwrap();

    let de = fs::read_to_string(project.path().join("de/translations.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&de).unwrap();
    assert_eq!(value["menu"]["open"], "");
    assert_eq!(value["title"], "");
}

/// A declined conflict leaves the project untouched.
#[test]
fn declined_rename_is_reported() {
    let settings = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    write_json_project(project.path(), "translations");

    let mut editor = Editor::launch(config(settings.path())).unwrap();
    editor.import_project(project.path()).unwrap();

    let err = editor.rename_key("menu.open", "title", |_| false).unwrap_err();
    assert!(err.is_unconfirmed());
    assert!(!editor.is_dirty());
    assert!(editor
        .project()
        .unwrap()
        .resources()
        .tree()
        .contains_leaf(&KeyPath::parse("menu.open").unwrap()));
}

struct Latest(&'static str);

#[async_trait::async_trait]
impl VersionSource for Latest {
    async fn latest_release(&self) -> Result<ReleaseInfo, VersionError> {
        Ok(ReleaseInfo {
            tag_name: self.0.to_string(),
            html_url: String::new(),
        })
    }
}

#[tokio::test]
async fn version_check_follows_settings() {
    let settings = TempDir::new().unwrap();
    fs::write(settings.path().join("editor.toml"), "check_version = \"false\"\n").unwrap();

    let disabled = Editor::launch(config(settings.path())).unwrap();
    assert!(disabled.check_version(&Latest("v999.0.0")).await.is_none());

    let enabled = Editor::new(config(settings.path()));
    let release = enabled.check_version(&Latest("v999.0.0")).await;
    assert_eq!(release.map(|r| r.tag_name), Some("v999.0.0".to_string()));
}
