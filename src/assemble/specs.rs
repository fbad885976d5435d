//! Spec installation: plugin test files into the app's spec directory

use std::fs;
use std::path::{Path, PathBuf};

use crate::plugin::{PluginId, TestFileRecord};
use crate::transform::transform_test;

use super::AssembleError;

/// Directory (relative to the app root) receiving installed specs.
pub(crate) fn spec_dir(app_dir: &Path) -> PathBuf {
    app_dir.join("www").join("js").join("spec")
}

/// Copy each plugin's test file into `<app>/www/js/spec/<id>-tests.js`,
/// transforming legacy-format files on the way through.
///
/// Plugins are handled in the order given. A plugin without a test file is
/// announced and skipped; it produces no spec file.
pub fn install_specs(app_dir: &Path, plugins: &[PluginId]) -> Result<(), AssembleError> {
    let spec_dir = spec_dir(app_dir);

    for plugin in plugins {
        let record = TestFileRecord::probe(app_dir, plugin);

        if !record.exists {
            println!("No tests found for \"{}\"", plugin);
            continue;
        }

        println!("Installing tests for \"{}\"", plugin);

        if !spec_dir.exists() {
            fs::create_dir_all(&spec_dir)?;
        }

        let source = fs::read_to_string(&record.source_path)?;
        let transformed = transform_test(&source);

        let dest = spec_dir.join(format!("{}-tests.js", plugin));
        fs::write(&dest, transformed)?;
    }

    Ok(())
}
