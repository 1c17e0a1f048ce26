//! On-disk tests: discovery, load, mutation and write-back of real files.

use lingo_resource::{discover, FileStore, ResourceSet, ResourceStore, ResourceType, WriteOptions};
use lingo_test_utils::{key, write_json_project, write_properties_project};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn boxed(stores: Vec<FileStore>) -> Vec<Box<dyn ResourceStore>> {
    stores.into_iter().map(|s| Box::new(s) as Box<dyn ResourceStore>).collect()
}

#[test]
fn json_project_round_trip() {
    let tmp = TempDir::new().unwrap();
    write_json_project(tmp.path(), "translations");

    let stores = discover(tmp.path(), "translations", None).unwrap();
    assert!(stores.iter().all(|s| s.kind() == ResourceType::Json));

    let mut set = ResourceSet::new();
    let report = set.open(boxed(stores));
    assert!(report.failed.is_empty());
    assert_eq!(report.keys, 3);
    assert_eq!(set.translation(&key("menu.close"), Some("nl")), Some(""));

    set.rename_key(&key("menu.open"), &key("menu.load"), |_| true).unwrap();
    let written = set.write_all(WriteOptions::minified());
    assert!(written.is_success());
    assert!(!set.is_dirty());

    let nl = fs::read_to_string(tmp.path().join("nl/translations.json")).unwrap();
    assert_eq!(nl, r#"{"menu":{"close":"","load":"Openen"},"title":""}"#);

    let mut reopened = ResourceSet::new();
    reopened.open(boxed(discover(tmp.path(), "translations", Some(ResourceType::Json)).unwrap()));
    assert_eq!(reopened.translation(&key("menu.load"), Some("en")), Some("Open"));
}

#[test]
fn properties_project_includes_default_store() {
    let tmp = TempDir::new().unwrap();
    write_properties_project(tmp.path(), "messages");

    let stores = discover(tmp.path(), "messages", Some(ResourceType::Properties)).unwrap();
    let mut set = ResourceSet::new();
    set.open(boxed(stores));

    assert_eq!(set.locales(), vec![None, Some("en")]);
    assert_eq!(set.translation(&key("farewell"), None), Some(""));

    set.set_translation(&key("farewell"), None, "Goodbye").unwrap();
    assert!(set.write_all(WriteOptions::default()).is_success());

    let default = fs::read_to_string(tmp.path().join("messages.properties")).unwrap();
    assert_eq!(default, "farewell = Goodbye\ngreeting = Hello\n");
}

#[test]
fn malformed_file_is_reported_not_fatal() {
    let tmp = TempDir::new().unwrap();
    write_json_project(tmp.path(), "translations");
    fs::write(tmp.path().join("nl/translations.json"), "{ not json").unwrap();

    let mut set = ResourceSet::new();
    let report = set.open(boxed(discover(tmp.path(), "translations", None).unwrap()));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].locale.as_deref(), Some("nl"));
    assert_eq!(set.locales(), vec![Some("en")]);
}
