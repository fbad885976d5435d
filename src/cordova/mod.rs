//! Cordova CLI invocation
//!
//! The platform CLI does the actual scaffolding: `create`, `platform add`,
//! `plugin add`. Every invocation is a synchronous, blocking child process
//! with inherited stdio; a nonzero exit is fatal to the generation run and
//! nothing is rolled back.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::plugin::PluginId;

/// Cordova invocation errors
#[derive(Debug, Error)]
pub enum CordovaError {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
    },
}

/// Handle on a Cordova CLI binary (global `cordova` or a local checkout's
/// `cordova-cli/bin/cordova`).
pub struct CordovaCli {
    bin: PathBuf,
    verbose: bool,
}

impl CordovaCli {
    pub fn new(bin: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            bin: bin.into(),
            verbose,
        }
    }

    /// Scaffold a new app at `app_dir` from the given template.
    pub fn create(
        &self,
        app_dir: &Path,
        package_id: &str,
        name: &str,
        template_dir: &Path,
    ) -> Result<(), CordovaError> {
        let copy_from = format!("--copy-from={}", template_dir.display());
        self.run(
            &[
                "create",
                &app_dir.display().to_string(),
                package_id,
                name,
                &copy_from,
            ],
            None,
        )
    }

    /// Add one platform to the app. `platform_spec` is either a registry
    /// platform name or a path to a local platform checkout.
    pub fn add_platform(&self, app_dir: &Path, platform_spec: &str) -> Result<(), CordovaError> {
        self.run(&["platform", "add", platform_spec], Some(app_dir))
    }

    /// Add plugins to the app, optionally resolving them through a local
    /// search path instead of the registry.
    pub fn add_plugins(
        &self,
        app_dir: &Path,
        plugins: &[PluginId],
        searchpath: Option<&Path>,
    ) -> Result<(), CordovaError> {
        let mut args: Vec<String> = vec!["plugin".to_string(), "add".to_string()];
        args.extend(plugins.iter().map(|p| p.as_str().to_string()));
        if let Some(searchpath) = searchpath {
            args.push("--searchpath".to_string());
            args.push(searchpath.display().to_string());
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&arg_refs, Some(app_dir))
    }

    /// Run the CLI with the given arguments, blocking until it exits.
    pub fn run(&self, args: &[&str], cwd: Option<&Path>) -> Result<(), CordovaError> {
        let command_string = format!("{} {}", self.bin.display(), args.join(" "));

        if self.verbose {
            println!("    RUNNING: {}", command_string);
        }

        let mut command = Command::new(&self.bin);
        command.args(args);
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }

        let status = command.status().map_err(|source| CordovaError::Launch {
            command: command_string.clone(),
            source,
        })?;

        if !status.success() {
            return Err(CordovaError::Failed {
                command: command_string,
                status,
            });
        }

        Ok(())
    }
}
