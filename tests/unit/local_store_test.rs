use serde_json::json;
use shopfront::storage::local_store::{LocalStore, CART_KEY, FAVORITES_KEY, THEME_KEY};

#[test]
fn test_set_creates_directory_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("data").join("store");
    let store = LocalStore::new(&nested);

    assert!(!nested.exists());
    store.set(THEME_KEY, &json!("dark")).unwrap();
    assert!(nested.join("theme.json").exists());
}

#[test]
fn test_slots_are_independent_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());

    store.set(CART_KEY, &json!({"id": "c1"})).unwrap();
    store.set(FAVORITES_KEY, &json!([])).unwrap();

    assert!(dir.path().join("cart.json").exists());
    assert!(dir.path().join("favorites.json").exists());
    assert_eq!(store.get_value(CART_KEY).unwrap()["id"], "c1");
    assert_eq!(store.get_value(FAVORITES_KEY).unwrap(), json!([]));
}

#[test]
fn test_set_replaces_whole_slot() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());

    store.set(CART_KEY, &json!({"id": "c1", "items": [1, 2, 3]})).unwrap();
    store.set(CART_KEY, &json!({"id": "c2"})).unwrap();

    let value = store.get_value(CART_KEY).unwrap();
    assert_eq!(value, json!({"id": "c2"}));
}

#[test]
fn test_typed_get_on_shape_mismatch_is_none_but_slot_survives() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    store.set(THEME_KEY, &json!({"unexpected": true})).unwrap();

    // Valid JSON of the wrong shape: typed read misses, raw read still works
    assert!(store.get::<String>(THEME_KEY).is_none());
    assert!(store.get_value(THEME_KEY).is_some());
    assert!(dir.path().join("theme.json").exists());
}

#[test]
fn test_corrupt_slot_is_cleared_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    std::fs::write(dir.path().join("cart.json"), "{ truncated").unwrap();

    assert!(store.get_value(CART_KEY).is_none());
    assert!(!dir.path().join("cart.json").exists());

    // The slot is usable again after the clear
    store.set(CART_KEY, &json!({"id": "c1"})).unwrap();
    assert!(store.get_value(CART_KEY).is_some());
}

#[test]
fn test_remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());

    store.set(THEME_KEY, &json!("dark")).unwrap();
    store.remove(THEME_KEY);
    assert!(store.get_value(THEME_KEY).is_none());
    store.remove(THEME_KEY);
}

#[test]
fn test_clones_share_the_same_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path());
    let clone = store.clone();

    store.set(THEME_KEY, &json!("light")).unwrap();
    assert_eq!(clone.get::<String>(THEME_KEY).unwrap(), "light");
}
