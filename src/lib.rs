//! Medivac - Cordova test-harness assembler
//!
//! This crate assembles a Cordova test app from a template: it installs the
//! bundled test specs of a set of plugins (transforming legacy-format test
//! files into runnable specs), rewrites the app's `index.html` and
//! `config.xml`, generates the runtime test configuration, and provides the
//! reporter that aggregates spec results on-device and delivers one summary
//! document per run to a CouchDB endpoint.

pub mod assemble;
pub mod config;
pub mod cordova;
pub mod plugin;
pub mod reporter;
pub mod transform;

pub use assemble::{assemble, AssembleError};
pub use config::RuntimeOptions;
pub use cordova::{CordovaCli, CordovaError};
pub use plugin::{PluginId, TestFileRecord};
pub use reporter::{DeviceInfo, MedicReporter, SpecResult, SpecStatus, TestLifecycle};
pub use transform::transform_test;
