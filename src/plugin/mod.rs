//! Plugin identifiers and test-file probing

use std::fmt;
use std::path::{Path, PathBuf};

/// Plugins every generated harness app gets, tested or not.
pub const DEFAULT_PLUGINS: &[&str] = &[
    "org.apache.cordova.device",
    "org.apache.cordova.console",
];

/// All core plugins, selectable as a set with the `--core` flag.
pub const CORE_PLUGINS: &[&str] = &[
    "org.apache.cordova.battery-status",
    "org.apache.cordova.camera",
    "org.apache.cordova.console",
    "org.apache.cordova.contacts",
    "org.apache.cordova.device",
    "org.apache.cordova.device-motion",
    "org.apache.cordova.device-orientation",
    "org.apache.cordova.dialogs",
    "org.apache.cordova.file",
    "org.apache.cordova.file-transfer",
    "org.apache.cordova.geolocation",
    "org.apache.cordova.globalization",
    "org.apache.cordova.inappbrowser",
    "org.apache.cordova.media",
    "org.apache.cordova.media-capture",
    "org.apache.cordova.network-information",
    "org.apache.cordova.splashscreen",
    "org.apache.cordova.statusbar",
    "org.apache.cordova.vibration",
];

/// Opaque plugin identifier (reverse-domain name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PluginId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Result of probing an installed plugin for its bundled test file.
///
/// `exists == false` is an expected outcome (not every plugin ships tests)
/// and never an error.
#[derive(Debug, Clone)]
pub struct TestFileRecord {
    pub plugin: PluginId,
    pub source_path: PathBuf,
    pub exists: bool,
}

impl TestFileRecord {
    /// Probe `<app>/plugins/<id>/tests/tests.js`.
    pub fn probe(app_dir: &Path, plugin: &PluginId) -> Self {
        let plugin_dir = app_dir.join("plugins").join(plugin.as_str());
        let source_path = plugin_dir.join("tests").join("tests.js");
        let exists = plugin_dir.is_dir() && source_path.is_file();
        Self {
            plugin: plugin.clone(),
            source_path,
            exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_plugins_are_a_subset_of_core() {
        for plugin in DEFAULT_PLUGINS {
            assert!(CORE_PLUGINS.contains(plugin), "{} missing from core set", plugin);
        }
    }

    #[test]
    fn probe_finds_existing_test_file() {
        let app = TempDir::new().unwrap();
        let tests_dir = app.path().join("plugins/org.example.thing/tests");
        fs::create_dir_all(&tests_dir).unwrap();
        fs::write(tests_dir.join("tests.js"), "// specs").unwrap();

        let record = TestFileRecord::probe(app.path(), &PluginId::from("org.example.thing"));
        assert!(record.exists);
        assert!(record.source_path.ends_with("tests/tests.js"));
    }

    #[test]
    fn probe_reports_missing_test_file() {
        let app = TempDir::new().unwrap();
        fs::create_dir_all(app.path().join("plugins/org.example.bare")).unwrap();

        let record = TestFileRecord::probe(app.path(), &PluginId::from("org.example.bare"));
        assert!(!record.exists);
    }

    #[test]
    fn probe_reports_missing_plugin_directory() {
        let app = TempDir::new().unwrap();
        let record = TestFileRecord::probe(app.path(), &PluginId::from("org.example.absent"));
        assert!(!record.exists);
    }
}
