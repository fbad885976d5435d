//! End-to-end artifact generation against a scratch app template

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use medivac::{assemble, AssembleError, PluginId, RuntimeOptions};

const INDEX_TEMPLATE: &str = "\
<!DOCTYPE html>
<html>
<body>
<!-- {{ SPECS }} -->
</body>
</html>
";

const MANIFEST_TEMPLATE: &str = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<widget id=\"org.apache.cordova.marine\">
    <name>marine</name>
</widget>
";

const LEGACY_TESTS: &str = "\
exports.defineAutoTests = function () {
    describe('legacy', function () {
        it('works', function () {
            expect(true).toBe(true);
        });
    });
};

exports.defineManualTests = function (content) {
    content.poke();
};
";

/// Lay out a minimal scaffolded app the way `cordova create --copy-from`
/// leaves it: entry page with the spec placeholder, pristine manifest, and
/// the template's test-config preamble.
fn scaffold_app() -> TempDir {
    let app = TempDir::new().unwrap();
    let www = app.path().join("www");
    fs::create_dir_all(www.join("js")).unwrap();
    fs::write(www.join("index.html"), INDEX_TEMPLATE).unwrap();
    fs::write(app.path().join("config.xml"), MANIFEST_TEMPLATE).unwrap();
    fs::write(www.join("js/test-config.js"), "// runtime config\n").unwrap();
    app
}

fn add_plugin_tests(app: &Path, id: &str, body: &str) {
    let dir = app.join("plugins").join(id).join("tests");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("tests.js"), body).unwrap();
}

fn add_bare_plugin(app: &Path, id: &str) {
    fs::create_dir_all(app.join("plugins").join(id)).unwrap();
}

fn plugin_ids(ids: &[&str]) -> Vec<PluginId> {
    ids.iter().map(|id| PluginId::from(*id)).collect()
}

fn options() -> RuntimeOptions {
    RuntimeOptions::new("localhost", 5984, Some("ci-42".to_string())).unwrap()
}

#[test]
fn generates_all_artifacts_for_a_plugin_set() {
    let app = scaffold_app();
    add_plugin_tests(
        app.path(),
        "org.apache.cordova.device",
        "describe('device', function () {});",
    );
    add_plugin_tests(app.path(), "org.apache.cordova.camera", LEGACY_TESTS);
    add_bare_plugin(app.path(), "org.apache.cordova.console");

    let plugins = plugin_ids(&[
        "org.apache.cordova.device",
        "org.apache.cordova.console",
        "org.apache.cordova.camera",
    ]);
    assemble(app.path(), &plugins, &options()).unwrap();

    // One spec file per plugin that ships tests; the bare plugin is skipped.
    let spec_dir = app.path().join("www/js/spec");
    assert!(spec_dir.join("org.apache.cordova.device-tests.js").is_file());
    assert!(spec_dir.join("org.apache.cordova.camera-tests.js").is_file());
    assert!(!spec_dir.join("org.apache.cordova.console-tests.js").exists());

    // The legacy file was transformed on the way in.
    let camera =
        fs::read_to_string(spec_dir.join("org.apache.cordova.camera-tests.js")).unwrap();
    assert!(!camera.contains("defineAutoTests"));
    assert!(!camera.contains("defineManualTests"));
    assert!(camera.contains("describe('legacy'"));

    // The entry page includes exactly the installed specs.
    let index = fs::read_to_string(app.path().join("www/index.html")).unwrap();
    assert!(!index.contains("<!-- {{ SPECS }} -->"));
    assert!(index.contains(
        "<script type=\"text/javascript\" src=\"js/spec/org.apache.cordova.camera-tests.js\"></script>"
    ));
    assert!(index.contains(
        "<script type=\"text/javascript\" src=\"js/spec/org.apache.cordova.device-tests.js\"></script>"
    ));
    assert_eq!(index.matches("<script").count(), 2);

    // The manifest whitelists the endpoint origin, exactly once.
    let manifest = fs::read_to_string(app.path().join("config.xml")).unwrap();
    assert_eq!(
        manifest
            .matches("<access origin=\"http://localhost:5984*\" />")
            .count(),
        1
    );
    assert_eq!(manifest.matches("</widget>").count(), 1);

    // The runtime config was appended after the template preamble.
    let config = fs::read_to_string(app.path().join("www/js/test-config.js")).unwrap();
    assert!(config.starts_with("// runtime config\n"));
    assert!(config.contains("var TEST_CONFIG = {"));
}

#[test]
fn runtime_config_round_trips_through_the_artifact() {
    let app = scaffold_app();
    assemble(app.path(), &[], &options()).unwrap();

    let config = fs::read_to_string(app.path().join("www/js/test-config.js")).unwrap();
    let json = config
        .split("var TEST_CONFIG = ")
        .nth(1)
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(value["result_id"], "ci-42");
    assert_eq!(value["couchdb_uri"], "http://localhost:5984");
    assert_eq!(value["result_table_name"], "mobilespec_results");
    assert_eq!(value["crash_table_name"], "mobilespec_crashes");
}

#[test]
fn empty_plugin_set_still_produces_page_manifest_and_config() {
    let app = scaffold_app();
    assemble(app.path(), &[], &options()).unwrap();

    let index = fs::read_to_string(app.path().join("www/index.html")).unwrap();
    assert!(!index.contains("<!-- {{ SPECS }} -->"));
    assert!(!index.contains("<script"));

    let manifest = fs::read_to_string(app.path().join("config.xml")).unwrap();
    assert!(manifest.contains("<access origin=\"http://localhost:5984*\" />"));
}

#[test]
fn missing_placeholder_fails_the_run() {
    let app = scaffold_app();
    fs::write(app.path().join("www/index.html"), "<html></html>").unwrap();

    let err = assemble(app.path(), &[], &options()).unwrap_err();
    assert!(matches!(err, AssembleError::MissingPlaceholder { .. }));
}

#[test]
fn broken_manifest_fails_the_run() {
    let app = scaffold_app();
    fs::write(app.path().join("config.xml"), "<widget>").unwrap();

    let err = assemble(app.path(), &[], &options()).unwrap_err();
    assert!(matches!(err, AssembleError::MissingClosingTag { .. }));
}

#[test]
fn plugin_order_does_not_affect_the_generated_include_list() {
    let first = scaffold_app();
    let second = scaffold_app();
    for app in [first.path(), second.path()] {
        add_plugin_tests(app, "org.apache.cordova.device", "describe('d', f);");
        add_plugin_tests(app, "org.apache.cordova.camera", "describe('c', f);");
    }

    assemble(
        first.path(),
        &plugin_ids(&["org.apache.cordova.device", "org.apache.cordova.camera"]),
        &options(),
    )
    .unwrap();
    assemble(
        second.path(),
        &plugin_ids(&["org.apache.cordova.camera", "org.apache.cordova.device"]),
        &options(),
    )
    .unwrap();

    let first_index = fs::read_to_string(first.path().join("www/index.html")).unwrap();
    let second_index = fs::read_to_string(second.path().join("www/index.html")).unwrap();
    assert_eq!(first_index, second_index);
}
