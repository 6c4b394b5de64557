use bridge_core::config::{BridgeConfig, CONFIG_FILE_NAME, LogLevel};
use bridge_core::error::config::ConfigError;

use std::time::Duration;

use tempfile::TempDir;

/// **VALUE**: Verifies a first run without `bridge.json` starts from defaults.
///
/// **BUG THIS CATCHES**: Would catch `load` treating a missing file as an error.
#[test]
fn given_missing_file_when_loading_then_defaults() {
    // GIVEN: An empty config directory
    let dir = TempDir::new().expect("tempdir");

    // WHEN: Loading
    let config = BridgeConfig::load(dir.path()).expect("load");

    // THEN: Defaults
    assert_eq!(config, BridgeConfig::default());
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.logging.file_name, "ipc-bridge.log");
    assert!(config.logging.stdout);
    assert_eq!(config.app.invoke_timeout(), None);
}

#[test]
fn given_saved_config_when_loading_then_same_values() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = BridgeConfig::default();
    config.logging.level = LogLevel::Debug;
    config.logging.stdout = false;
    config
        .host
        .versions
        .insert("shell".to_string(), "1.2.3".to_string());
    config.app.invoke_timeout_ms = Some(2500);

    config.save(dir.path()).expect("save");
    let loaded = BridgeConfig::load(dir.path()).expect("load");

    assert_eq!(loaded, config);
    assert_eq!(loaded.app.invoke_timeout(), Some(Duration::from_millis(2500)));
    assert_eq!(
        loaded.host.process_versions().get("shell"),
        Some("1.2.3")
    );
}

/// **VALUE**: Verifies the atomic write leaves only the final file behind.
#[test]
fn given_save_when_finished_then_no_temp_file_left() {
    let dir = TempDir::new().expect("tempdir");

    BridgeConfig::default().save(dir.path()).expect("save");

    assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    assert!(!dir.path().join(format!("{CONFIG_FILE_NAME}.tmp")).exists());
}

#[test]
fn given_partial_file_when_loading_then_missing_fields_defaulted() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{ "logging": { "level": "warn" } }"#,
    )
    .expect("write");

    let config = BridgeConfig::load(dir.path()).expect("load");

    assert_eq!(config.version, 1);
    assert_eq!(config.logging.level, LogLevel::Warn);
    assert_eq!(config.logging.file_name, "ipc-bridge.log");
}

/// **VALUE**: Verifies a corrupt file is reported, not silently replaced by defaults.
///
/// **BUG THIS CATCHES**: Would catch a parse failure falling back to defaults and the next
/// `save` overwriting the user's file.
#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").expect("write");

    let error = BridgeConfig::load(dir.path()).expect_err("must fail");

    assert!(matches!(error, ConfigError::Parse { .. }));
}

#[test]
fn given_invalid_values_when_validating_then_field_named() {
    let cases: Vec<(&str, Box<dyn Fn(&mut BridgeConfig)>)> = vec![
        ("version", Box::new(|config: &mut BridgeConfig| config.version = 0)),
        ("version", Box::new(|config: &mut BridgeConfig| config.version = 2)),
        (
            "logging.file_name",
            Box::new(|config: &mut BridgeConfig| config.logging.file_name = String::new()),
        ),
        (
            "logging.file_name",
            Box::new(|config: &mut BridgeConfig| {
                config.logging.file_name = "../escape.log".to_string()
            }),
        ),
        (
            "host.versions",
            Box::new(|config: &mut BridgeConfig| {
                config.host.versions.insert(" ".to_string(), "1".to_string());
            }),
        ),
        (
            "app.invoke_timeout_ms",
            Box::new(|config: &mut BridgeConfig| config.app.invoke_timeout_ms = Some(0)),
        ),
    ];

    for (expected_field, corrupt) in cases {
        let mut config = BridgeConfig::default();
        corrupt(&mut config);

        match config.validate() {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected Validation on {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn given_invalid_config_when_saving_then_nothing_written() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = BridgeConfig::default();
    config.app.invoke_timeout_ms = Some(0);

    let error = config.save(dir.path()).expect_err("must fail");

    assert!(matches!(error, ConfigError::Validation { .. }));
    assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
}
