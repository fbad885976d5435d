//! Index-page rewrite: spec placeholder into script includes

use std::fs;
use std::path::Path;

use super::{specs::spec_dir, AssembleError, SPEC_PLACEHOLDER};

/// Replace the spec placeholder in `<app>/www/index.html` with one script
/// tag per installed spec file.
///
/// The spec directory is listed fresh rather than derived from the requested
/// plugin set, since plugins without a test file produce no spec file. The
/// listing is sorted by file name so the include order is stable.
pub fn rewrite_index(app_dir: &Path) -> Result<(), AssembleError> {
    let index_path = app_dir.join("www").join("index.html");
    let content = fs::read_to_string(&index_path)?;

    if !content.contains(SPEC_PLACEHOLDER) {
        return Err(AssembleError::MissingPlaceholder {
            path: index_path.display().to_string(),
        });
    }

    let tags = script_tags(app_dir)?;
    let rewritten = content.replacen(SPEC_PLACEHOLDER, &tags.join("\n"), 1);
    fs::write(&index_path, rewritten)?;

    Ok(())
}

/// One `<script>` include per file in the spec directory, sorted by name.
/// An absent spec directory (no plugin shipped tests) yields no tags.
fn script_tags(app_dir: &Path) -> Result<Vec<String>, AssembleError> {
    let spec_dir = spec_dir(app_dir);
    if !spec_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(&spec_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    Ok(names
        .into_iter()
        .map(|name| {
            format!(
                "<script type=\"text/javascript\" src=\"js/spec/{}\"></script>",
                name
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_index(app: &Path, body: &str) {
        let www = app.join("www");
        fs::create_dir_all(&www).unwrap();
        fs::write(www.join("index.html"), body).unwrap();
    }

    fn add_spec(app: &Path, name: &str) {
        let dir = spec_dir(app);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), "// spec").unwrap();
    }

    #[test]
    fn placeholder_becomes_sorted_script_tags() {
        let app = TempDir::new().unwrap();
        write_index(app.path(), "<body>\n<!-- {{ SPECS }} -->\n</body>\n");
        add_spec(app.path(), "org.example.b-tests.js");
        add_spec(app.path(), "org.example.a-tests.js");

        rewrite_index(app.path()).unwrap();

        let index = fs::read_to_string(app.path().join("www/index.html")).unwrap();
        assert!(!index.contains(SPEC_PLACEHOLDER));
        let a = index.find("js/spec/org.example.a-tests.js").unwrap();
        let b = index.find("js/spec/org.example.b-tests.js").unwrap();
        assert!(a < b);
        assert_eq!(index.matches("<script").count(), 2);
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let app = TempDir::new().unwrap();
        write_index(app.path(), "<body></body>\n");

        let err = rewrite_index(app.path()).unwrap_err();
        assert!(matches!(err, AssembleError::MissingPlaceholder { .. }));
    }

    #[test]
    fn empty_spec_dir_removes_placeholder_and_adds_nothing() {
        let app = TempDir::new().unwrap();
        write_index(app.path(), "<body>\n<!-- {{ SPECS }} -->\n</body>\n");

        rewrite_index(app.path()).unwrap();

        let index = fs::read_to_string(app.path().join("www/index.html")).unwrap();
        assert!(!index.contains(SPEC_PLACEHOLDER));
        assert!(!index.contains("<script"));
    }
}
