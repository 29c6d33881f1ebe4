use std::fs;

use folio::config::{CONFIG_ENV, CollectionKind, ViewConfig};
use folio::query::{FilterMode, SearchMatch};
use folio::view::LoadMode;
use serial_test::serial;
use tempfile::TempDir;

fn set_config_env(path: &std::path::Path) {
    // SAFETY: every test touching the variable is #[serial]
    unsafe { std::env::set_var(CONFIG_ENV, path) };
}

fn clear_config_env() {
    // SAFETY: every test touching the variable is #[serial]
    unsafe { std::env::remove_var(CONFIG_ENV) };
}

#[test]
#[serial]
fn test_env_var_names_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("folio.yaml");
    fs::write(&path, "kind: leads\npage_size: 10\nsearch_match: fuzzy\n").unwrap();
    set_config_env(&path);

    let config = ViewConfig::load(None);
    clear_config_env();

    let config = config.unwrap();
    assert_eq!(config.kind, CollectionKind::Leads);
    assert_eq!(config.page_size, 10);
    assert_eq!(config.search_match, SearchMatch::Fuzzy);
    assert_eq!(config.filter_mode, FilterMode::Client);
}

#[test]
#[serial]
fn test_env_var_pointing_nowhere_falls_back_to_preset() {
    let dir = TempDir::new().unwrap();
    set_config_env(&dir.path().join("absent.yaml"));

    let config = ViewConfig::load(Some(CollectionKind::Templates));
    clear_config_env();

    let config = config.unwrap();
    assert_eq!(config, ViewConfig::preset(CollectionKind::Templates));
    assert_eq!(config.mode, LoadMode::InfiniteScroll);
}

#[test]
#[serial]
fn test_empty_env_var_uses_default_location() {
    // SAFETY: every test touching the variable is #[serial]
    unsafe { std::env::set_var(CONFIG_ENV, "") };
    let path = ViewConfig::config_path();
    clear_config_env();

    assert!(path.ends_with(".folio/config.yaml"));
}

#[test]
#[serial]
fn test_invalid_file_named_by_env_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("folio.yaml");
    fs::write(&path, "initial_batch: 0\n").unwrap();
    set_config_env(&path);

    let result = ViewConfig::load(None);
    clear_config_env();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("initial_batch"));
}
