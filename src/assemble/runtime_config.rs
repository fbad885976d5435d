//! Runtime configuration artifact (`test-config.js`)

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::config::RuntimeOptions;

use super::{AssembleError, CONFIG_VAR_NAME};

/// Append one assignment of the serialized [`RuntimeOptions`] to the
/// well-known `TEST_CONFIG` identifier in `<app>/www/js/test-config.js`.
///
/// The file comes from the template and may carry prior content; the
/// assignment is appended, never overwritten, and the device runtime reads
/// the identifier as process-wide configuration at startup.
pub fn append_runtime_config(
    app_dir: &Path,
    options: &RuntimeOptions,
) -> Result<(), AssembleError> {
    let config_path = app_dir.join("www").join("js").join("test-config.js");
    let serialized = serde_json::to_string(options)?;

    println!("passing this config to the app:");
    println!("    {}", serialized);

    let mut file = OpenOptions::new().append(true).open(&config_path)?;
    write!(file, "var {} = {};", CONFIG_VAR_NAME, serialized)?;

    Ok(())
}
