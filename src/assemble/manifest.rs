//! Manifest rewrite: network whitelist rule in `config.xml`

use std::fs;
use std::path::Path;

use super::AssembleError;

const CLOSING_TAG: &str = "</widget>";

/// Add one `<access origin="..." />` rule to `<app>/config.xml`, keeping a
/// single closing `</widget>` tag at the end.
///
/// Precondition: the manifest is a pristine template. The rewrite strips the
/// closing tag and re-appends it after the rule, so running it twice against
/// the same file leaves two rules and a malformed document. Callers
/// regenerate the app from the template each run instead of re-running this
/// step in place.
pub fn add_whitelist_rule(app_dir: &Path, rule: &str) -> Result<(), AssembleError> {
    let manifest_path = app_dir.join("config.xml");
    let content = fs::read_to_string(&manifest_path)?;

    if !content.contains(CLOSING_TAG) {
        return Err(AssembleError::MissingClosingTag {
            path: manifest_path.display().to_string(),
        });
    }

    println!("Adding whitelist rule: {}", rule);

    let body: String = content.split(CLOSING_TAG).collect();
    let rewritten = format!(
        "{}    <access origin=\"{}\" />\n{}",
        body, rule, CLOSING_TAG
    );
    fs::write(&manifest_path, rewritten)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <widget id=\"org.apache.cordova.marine\">\n\
        \x20   <name>marine</name>\n\
        </widget>\n";

    fn write_manifest(app: &Path, body: &str) {
        fs::write(app.join("config.xml"), body).unwrap();
    }

    #[test]
    fn pristine_template_gains_exactly_one_rule_and_one_closing_tag() {
        let app = TempDir::new().unwrap();
        write_manifest(app.path(), TEMPLATE);

        add_whitelist_rule(app.path(), "http://localhost:5984*").unwrap();

        let manifest = fs::read_to_string(app.path().join("config.xml")).unwrap();
        assert_eq!(
            manifest
                .matches("<access origin=\"http://localhost:5984*\" />")
                .count(),
            1
        );
        assert_eq!(manifest.matches(CLOSING_TAG).count(), 1);
        // The rule sits before the closing tag.
        assert!(manifest.find("<access").unwrap() < manifest.find(CLOSING_TAG).unwrap());
    }

    #[test]
    fn manifest_without_closing_tag_is_an_error() {
        let app = TempDir::new().unwrap();
        write_manifest(app.path(), "<widget id=\"x\">\n");

        let err = add_whitelist_rule(app.path(), "http://localhost:5984*").unwrap_err();
        assert!(matches!(err, AssembleError::MissingClosingTag { .. }));
    }

    #[test]
    fn existing_template_content_is_preserved() {
        let app = TempDir::new().unwrap();
        write_manifest(app.path(), TEMPLATE);

        add_whitelist_rule(app.path(), "http://couch:5984*").unwrap();

        let manifest = fs::read_to_string(app.path().join("config.xml")).unwrap();
        assert!(manifest.contains("<name>marine</name>"));
        assert!(manifest.contains("org.apache.cordova.marine"));
    }
}
