//! Artifact generation for a scaffolded test app
//!
//! Takes an app directory freshly created from the template, a caller-ordered
//! set of plugin ids, and the run's [`RuntimeOptions`], and produces the
//! artifacts the on-device harness needs:
//!
//! 1. one runnable spec file per plugin that ships tests
//!    (`www/js/spec/<id>-tests.js`);
//! 2. an `index.html` whose spec placeholder is replaced with script tags;
//! 3. a `config.xml` whitelisting the report endpoint's origin;
//! 4. a `test-config.js` carrying the serialized runtime options.
//!
//! The whole pass is fail-fast: the first I/O error aborts generation and no
//! partially written artifact is cleaned up. The manifest and config-artifact
//! steps are append-style and not idempotent; run them only against a
//! pristine template, never in place a second time.

mod manifest;
mod page;
mod runtime_config;
mod specs;

pub use manifest::add_whitelist_rule;
pub use page::rewrite_index;
pub use runtime_config::append_runtime_config;
pub use specs::install_specs;

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::config::RuntimeOptions;
use crate::plugin::PluginId;

/// Placeholder token in the template's `index.html`.
pub const SPEC_PLACEHOLDER: &str = "<!-- {{ SPECS }} -->";

/// Well-known identifier the runtime config is assigned to.
pub const CONFIG_VAR_NAME: &str = "TEST_CONFIG";

/// Artifact-generation errors
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index page {path} has no spec placeholder")]
    MissingPlaceholder { path: String },

    #[error("manifest {path} has no closing </widget> tag")]
    MissingClosingTag { path: String },
}

/// Generate all test-app artifacts under `app_dir`.
///
/// Plugins are processed in caller order; plugins without a test file are
/// skipped with a console notice. Fails fast on the first I/O error.
pub fn assemble(
    app_dir: &Path,
    plugins: &[PluginId],
    options: &RuntimeOptions,
) -> Result<(), AssembleError> {
    specs::install_specs(app_dir, plugins)?;
    page::rewrite_index(app_dir)?;
    manifest::add_whitelist_rule(app_dir, &options.whitelist_rule())?;
    runtime_config::append_runtime_config(app_dir, options)?;
    Ok(())
}
