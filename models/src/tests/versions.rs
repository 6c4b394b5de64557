use crate::versions::ProcessVersions;

use serde_json::json;

#[test]
fn given_current_versions_then_reports_bridge_os_and_arch() {
    let versions = ProcessVersions::current();

    assert_eq!(versions.get("bridge"), Some(env!("CARGO_PKG_VERSION")));
    assert_eq!(versions.get("os"), Some(std::env::consts::OS));
    assert_eq!(versions.get("arch"), Some(std::env::consts::ARCH));
}

/// **VALUE**: Verifies the flat-object wire form of the version map.
///
/// **WHY THIS MATTERS**: The liveness probe's reply is compared field by field by callers
/// (`{"node": "20.0.0"}`); a wrapper object would break them.
#[test]
fn given_versions_when_serialized_then_is_flat_object() {
    // GIVEN: A single entry
    let versions: ProcessVersions = [("node", "20.0.0")].into_iter().collect();

    // WHEN: Serializing
    let value = serde_json::to_value(&versions).expect("serialize");

    // THEN: Flat object
    assert_eq!(value, json!({ "node": "20.0.0" }));
}

#[test]
fn given_overrides_when_merged_then_replace_existing_components() {
    let mut versions = ProcessVersions::current();

    versions.merge([
        ("os".to_string(), "custom-os".to_string()),
        ("app".to_string(), "2.1.0".to_string()),
    ]);

    assert_eq!(versions.get("os"), Some("custom-os"));
    assert_eq!(versions.get("app"), Some("2.1.0"));
}
