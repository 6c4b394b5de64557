use ipc_bridge::paths::{CONFIG_DIR_ENV, log_dir, resolve_config_dir};

use std::path::PathBuf;

use serial_test::serial;

/// **VALUE**: Verifies the environment override wins over the platform directory.
///
/// **WHY THIS MATTERS**: Tests and packaged installs point the binary at their own
/// directory; ignoring the override would read and write the user's real config.
#[test]
#[serial]
fn given_env_override_when_resolving_then_override_used() {
    // GIVEN: The override set
    // SAFETY: `#[serial]` keeps other tests in this binary from touching the environment.
    unsafe { std::env::set_var(CONFIG_DIR_ENV, "/tmp/ipc-bridge-test-config") };

    // WHEN: Resolving
    let dir = resolve_config_dir();

    // THEN: The override is returned verbatim
    unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    assert_eq!(
        dir.expect("config dir"),
        PathBuf::from("/tmp/ipc-bridge-test-config")
    );
}

#[test]
#[serial]
fn given_blank_override_when_resolving_then_ignored() {
    // SAFETY: see above.
    unsafe { std::env::set_var(CONFIG_DIR_ENV, "  ") };

    let dir = resolve_config_dir();

    unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    if let Ok(dir) = dir {
        assert!(dir.ends_with("ipc-bridge"));
    }
}

#[test]
fn given_config_dir_when_asking_log_dir_then_logs_subdirectory() {
    assert_eq!(
        log_dir(&PathBuf::from("/etc/bridge")),
        PathBuf::from("/etc/bridge/logs")
    );
}
