//! Integration tests for Settings config loading with layered precedence.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treeload::config::{local_config_path, Settings};
use treeload::domain::LoadMode;

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.load_mode, LoadMode::Sync);
    assert_eq!(settings.path_delimiter, '/');
    assert_eq!(settings.default_order, "sort");
    assert_eq!(settings.page_size, 20);
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
load_mode = "async"
path_delimiter = "."
page_size = 50
data_file = "/srv/nodes.json"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.load_mode, LoadMode::Async);
    assert_eq!(settings.path_delimiter, '.');
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.data_file, Some(PathBuf::from("/srv/nodes.json")));
    // unspecified fields keep defaults
    assert_eq!(settings.default_order, "sort");
    assert_eq!(settings.codec().delimiter(), '.');
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "load_mode = [").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains("config error"), "{err}");
}

#[test]
fn given_zero_page_size_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "page_size = 0\n").unwrap();

    assert!(Settings::load(Some(dir.path())).is_err());
}

#[test]
fn given_template_when_parsed_then_is_valid_toml() {
    let template = Settings::template();
    let parsed: Result<toml::Value, _> = toml::from_str(&template);
    assert!(parsed.is_ok());
}
