use serde_json::json;
use shopfront::services::preferences::{PreferencesService, PreferencesServiceTrait};
use shopfront::storage::local_store::{LocalStore, THEME_KEY};
use shopfront::types::preferences::ThemeMode;

fn prefs(dir: &std::path::Path) -> PreferencesService {
    PreferencesService::new(LocalStore::new(dir))
}

#[test]
fn test_theme_defaults_to_system_when_unset() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(prefs(dir.path()).theme(), ThemeMode::System);
}

#[test]
fn test_theme_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    prefs(dir.path()).set_theme(ThemeMode::Dark).unwrap();
    assert_eq!(prefs(dir.path()).theme(), ThemeMode::Dark);
}

#[test]
fn test_theme_slot_stores_lowercase_name() {
    let dir = tempfile::tempdir().unwrap();
    prefs(dir.path()).set_theme(ThemeMode::Light).unwrap();

    let raw = LocalStore::new(dir.path()).get_value(THEME_KEY).unwrap();
    assert_eq!(raw, json!("light"));
}

#[test]
fn test_corrupt_theme_slot_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("theme.json"), "not json").unwrap();
    assert_eq!(prefs(dir.path()).theme(), ThemeMode::System);
}

#[test]
fn test_unrecognized_theme_value_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    LocalStore::new(dir.path())
        .set(THEME_KEY, &json!("sepia"))
        .unwrap();
    assert_eq!(prefs(dir.path()).theme(), ThemeMode::System);
}

#[test]
fn test_cookie_consent_absent_until_decided() {
    let dir = tempfile::tempdir().unwrap();
    assert!(prefs(dir.path()).cookie_consent().is_none());
}

#[test]
fn test_cookie_consent_records_decision() {
    let dir = tempfile::tempdir().unwrap();
    let service = prefs(dir.path());

    service.set_cookie_consent(false).unwrap();
    let consent = service.cookie_consent().unwrap();
    assert!(!consent.accepted);
    assert!(consent.decided_at > 0);

    // A later decision overwrites the earlier one
    service.set_cookie_consent(true).unwrap();
    assert!(service.cookie_consent().unwrap().accepted);
}
