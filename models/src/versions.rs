use std::collections::BTreeMap;
use std::collections::btree_map::{IntoIter, Iter};

use serde::{Deserialize, Serialize};

/// Version map returned by the host's liveness probe (`ping`).
///
/// Serialized as a flat JSON object (`{"bridge": "0.1.0", "os": "linux", …}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessVersions(BTreeMap<String, String>);

impl ProcessVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions describing the running process: bridge version, OS, architecture and family.
    pub fn current() -> Self {
        let mut versions = Self::new();
        versions.insert("bridge", env!("CARGO_PKG_VERSION"));
        versions.insert("os", std::env::consts::OS);
        versions.insert("arch", std::env::consts::ARCH);
        versions.insert("family", std::env::consts::FAMILY);
        versions
    }

    pub fn insert(&mut self, component: impl Into<String>, version: impl Into<String>) {
        self.0.insert(component.into(), version.into());
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.0.get(component).map(String::as_str)
    }

    /// Adds every entry of `other`, overriding components that are already present.
    pub fn merge(&mut self, other: impl IntoIterator<Item = (String, String)>) {
        self.0.extend(other);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProcessVersions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(component, version)| (component.into(), version.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ProcessVersions {
    type Item = (String, String);
    type IntoIter = IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
