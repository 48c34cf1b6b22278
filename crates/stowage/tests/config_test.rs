//! Tests for layered configuration loading.

use std::path::Path;
use stowage::{DEFAULT_MAX_BYTES, StowageConfig};
use tempfile::TempDir;

#[test]
fn test_overrides_apply_on_top_of_defaults() {
    let config = StowageConfig::from_toml_str(
        r#"
        [storage]
        root = "/srv/uploads"

        [admission]
        max_bytes = 1024
        "#,
    )
    .unwrap();

    assert_eq!(config.storage().root(), Path::new("/srv/uploads"));
    assert_eq!(*config.admission().max_bytes(), 1024);
    // Untouched values keep their defaults.
    assert_eq!(config.admission().allowed_type_prefixes(), &vec!["image/".to_string()]);
    assert!(config.namespace("avatars").is_some());
}

#[test]
fn test_namespace_retention_override() {
    let config = StowageConfig::from_toml_str(
        r#"
        [[namespaces]]
        name = "avatars"
        prefix = "avatar"

        [namespaces.retention]
        max_age_seconds = 600
        sweep_interval_seconds = 60
        sweep_on_start = true
        "#,
    )
    .unwrap();

    let avatars = config.namespace("avatars").unwrap();
    assert_eq!(*avatars.retention().max_age_seconds(), 600);
    assert_eq!(*avatars.retention().sweep_interval_seconds(), 60);
    assert!(*avatars.retention().sweep_on_start());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(StowageConfig::from_toml_str("[admission]\nmax_bytes = 0").is_err());
    assert!(StowageConfig::from_toml_str("[admission]\nmax_size = 10").is_err());
    assert!(StowageConfig::from_toml_str("[storage]\nroot = [1, 2]").is_err());
}

#[test]
fn test_unschedulable_sweep_interval_is_rejected() {
    let result = StowageConfig::from_toml_str(
        r#"
        [[namespaces]]
        name = "avatars"
        prefix = "avatar"

        [namespaces.retention]
        sweep_interval_seconds = 9223372036854775807
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_explicit_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    std::fs::write(
        &path,
        format!(
            "[storage]\nroot = {:?}\n",
            temp_dir.path().join("assets").display().to_string()
        ),
    )
    .unwrap();

    let config = StowageConfig::load_from(Some(path.as_path())).unwrap();

    assert_eq!(config.storage().root(), &temp_dir.path().join("assets"));
    assert_eq!(*config.admission().max_bytes(), DEFAULT_MAX_BYTES);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = StowageConfig::load_from(Some(temp_dir.path().join("nope.toml").as_path()));
    assert!(result.is_err());
}
