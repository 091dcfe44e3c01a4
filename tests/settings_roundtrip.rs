use pc_tuner::settings::{self, Settings, SettingsStore};
use proptest::prelude::*;
use std::collections::BTreeMap;

proptest! {
    #[test]
    fn saved_settings_load_back_unchanged(
        map in proptest::collection::btree_map("[a-z_]{1,24}", any::<bool>(), 0..40)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
        store.save(&map).unwrap();
        prop_assert_eq!(store.load().unwrap(), map);
    }
}

#[test]
fn last_write_wins_per_option() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("settings.json"));

    let mut s = Settings::new();
    s.insert("appearance_dark_mode".into(), true);
    store.save(&s).unwrap();
    s.insert("appearance_dark_mode".into(), false);
    store.save(&s).unwrap();

    assert_eq!(store.load().unwrap().get("appearance_dark_mode"), Some(&false));
}

#[test]
fn corrupt_file_is_an_error_but_load_or_empty_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = SettingsStore::new(&path);
    assert!(store.load().is_err());
    assert!(store.load_or_empty().is_empty());
}

#[test]
fn export_then_import_keeps_only_booleans() {
    let dir = tempfile::tempdir().unwrap();
    let value = serde_json::json!({
        "explorer_show_hidden": true,
        "network_optimization": false,
        "theme": "dark",
        "version": 3
    });

    let path = settings::export_settings(&value, dir.path()).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("pc-tuner-settings-"));
    assert!(name.ends_with(".json"));

    let imported = settings::import_settings(&path).unwrap();
    let expected: BTreeMap<String, bool> = [
        ("explorer_show_hidden".to_string(), true),
        ("network_optimization".to_string(), false),
    ]
    .into_iter()
    .collect();
    assert_eq!(imported, expected);
}

#[test]
fn importing_a_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(settings::import_settings(&dir.path().join("nope.json")).is_err());
}
