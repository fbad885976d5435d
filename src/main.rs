//! Medivac CLI
//!
//! Assembles a Cordova test-harness app: scaffolds it from the bundled
//! template, installs the requested platforms and plugins, installs each
//! plugin's test specs, and wires the app up to report results to CouchDB.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use console::style;

use medivac::plugin::{CORE_PLUGINS, DEFAULT_PLUGINS};
use medivac::{assemble, CordovaCli, PluginId, RuntimeOptions};

/// Directory holding the harness checkout, expected under the working
/// directory alongside the platform/plugin checkouts.
const MEDIVAC_DIR_NAME: &str = "cordova-medivac";

/// App template inside the harness checkout.
const TEMPLATE_DIR_NAME: &str = "app-template";

#[derive(Parser)]
#[command(name = "medivac")]
#[command(about = "Assemble a Cordova test-harness app", version)]
struct Cli {
    // Platforms
    /// Add Amazon FireOS platform
    #[arg(long)]
    amazon: bool,

    /// Add Android platform
    #[arg(long)]
    android: bool,

    /// Add BlackBerry 10 platform
    #[arg(long)]
    blackberry10: bool,

    /// Add iOS platform
    #[arg(long)]
    ios: bool,

    /// Add browser platform
    #[arg(long)]
    browser: bool,

    /// Add Windows (universal) platform
    #[arg(long)]
    windows: bool,

    /// Add Windows 8 (desktop) platform
    #[arg(long)]
    windows8: bool,

    /// Add Windows Phone 8 platform
    #[arg(long)]
    wp8: bool,

    // Arguments
    /// Hostname of the CouchDB server recording results
    #[arg(long, default_value = "localhost")]
    couchdb_host: String,

    /// Port of the CouchDB server
    #[arg(long, default_value_t = 5984)]
    couchdb_port: u16,

    /// Name for the test app
    #[arg(long, default_value = "marine")]
    name: String,

    /// Identifier for the results; without one, result documents are POSTed
    /// and the store picks an id
    #[arg(long)]
    result_id: Option<String>,

    // Flags
    /// Be verbose
    #[arg(short, long)]
    verbose: bool,

    /// Test all core org.apache.cordova plugins
    #[arg(long, conflicts_with = "plugins")]
    core: bool,

    /// Use the globally installed `cordova` and registry platforms/plugins
    /// instead of local checkouts
    #[arg(long)]
    global: bool,

    /// Plugin ids to install and test
    plugins: Vec<String>,
}

impl Cli {
    fn platforms(&self) -> Vec<&'static str> {
        let mut platforms = Vec::new();
        if self.amazon {
            platforms.push("amazon-fireos");
        }
        if self.android {
            platforms.push("android");
        }
        if self.browser {
            platforms.push("browser");
        }
        if self.ios {
            platforms.push("ios");
        }
        if self.blackberry10 {
            platforms.push("blackberry10");
        }
        if self.wp8 {
            platforms.push("wp8");
        }
        if self.windows8 {
            platforms.push("windows8");
        }
        if self.windows {
            platforms.push("windows");
        }
        platforms
    }

    fn plugin_ids(&self) -> Vec<PluginId> {
        if self.core {
            CORE_PLUGINS.iter().map(|id| PluginId::from(*id)).collect()
        } else {
            self.plugins.iter().map(|id| PluginId::new(id)).collect()
        }
    }
}

fn progress(message: &str) {
    println!("{}", style(message).green());
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let platforms = cli.platforms();
    if platforms.is_empty() {
        return Err("No platforms specified.".into());
    }

    let plugins = cli.plugin_ids();
    if plugins.is_empty() {
        return Err("No plugins specified.".into());
    }

    let base_dir = std::env::current_dir()?;
    let medivac_dir = base_dir.join(MEDIVAC_DIR_NAME);
    let template_dir = medivac_dir.join(TEMPLATE_DIR_NAME);
    let app_dir = base_dir.join(&cli.name);
    let cordova = if cli.global {
        CordovaCli::new("cordova", cli.verbose)
    } else {
        CordovaCli::new(base_dir.join("cordova-cli").join("bin").join("cordova"), cli.verbose)
    };

    if cli.verbose {
        println!("template_dir: {}", template_dir.display());
        println!("app_dir:      {}", app_dir.display());
    }

    // Setup checks happen before anything on disk is touched.
    if !medivac_dir.is_dir() {
        return Err(format!(
            "Please run this tool from the directory containing {}.",
            MEDIVAC_DIR_NAME
        )
        .into());
    }

    // A leftover app from an earlier run is replaced wholesale; the manifest
    // and config-artifact rewrites only work against a pristine template.
    if app_dir.exists() {
        fs::remove_dir_all(&app_dir).map_err(|_| {
            format!(
                "Failed to remove old app; please remove {} manually.",
                app_dir.display()
            )
        })?;
    }

    progress("Creating app");
    let package_id = format!("org.apache.cordova.{}", cli.name);
    cordova.create(&app_dir, &package_id, &cli.name, &template_dir)?;

    progress("Installing platforms");
    for platform in &platforms {
        let platform_spec = if cli.global {
            (*platform).to_string()
        } else {
            platform_checkout(&base_dir, platform).display().to_string()
        };
        cordova.add_platform(&app_dir, &platform_spec)?;
    }

    progress("Installing plugins");
    let searchpath = (!cli.global).then_some(base_dir.as_path());
    let default_plugins: Vec<PluginId> =
        DEFAULT_PLUGINS.iter().map(|id| PluginId::from(*id)).collect();
    cordova.add_plugins(&app_dir, &default_plugins, searchpath)?;
    cordova.add_plugins(&app_dir, &plugins, searchpath)?;

    progress("Installing tests");
    let options = RuntimeOptions::new(&cli.couchdb_host, cli.couchdb_port, cli.result_id.clone())?;
    assemble(&app_dir, &plugins, &options)?;

    progress("Done");
    println!("To run the tests, run: cd {} && cordova run", cli.name);

    Ok(())
}

/// Path to a local platform checkout next to the harness checkout.
fn platform_checkout(base_dir: &std::path::Path, platform: &str) -> PathBuf {
    base_dir.join(format!("cordova-{}", platform))
}
