//! Legacy test-file transformation
//!
//! Plugins written against the old test harness export their specs through
//! `exports.defineAutoTests` (and optionally `exports.defineManualTests`).
//! To run such a file as a standalone browser spec, the wrapper has to be
//! peeled off while leaving the spec bodies untouched.

use regex_lite::Regex;

/// Marker identifying a legacy-format test file.
const AUTO_TESTS_MARKER: &str = "exports.defineAutoTests";

/// Transform a legacy-format test file into a runnable spec.
///
/// If the source contains the auto-tests marker, three rewrites are applied,
/// necessarily in this order:
///
/// 1. remove everything from the `defineManualTests` declaration (if any)
///    through end of file;
/// 2. remove the line containing the `defineAutoTests` declaration;
/// 3. remove the last `}` in the file and everything after it.
///
/// Sources without the marker are returned unchanged.
///
/// Step 3 is brace-naive on purpose: it strips the final `}`-prefixed tail
/// unconditionally, matching the behavior every published plugin test file
/// has been transformed with. A file whose last closing brace is followed by
/// further code gets that code truncated.
pub fn transform_test(source: &str) -> String {
    if !source.contains(AUTO_TESTS_MARKER) {
        return source.to_string();
    }

    let manual_re = Regex::new(r"(?is)exports\.defineManualTests.*").unwrap();
    let auto_re = Regex::new(r"exports\.defineAutoTests.*").unwrap();
    let tail_re = Regex::new(r"\}[^}]*$").unwrap();

    let stripped = manual_re.replace(source, "");
    let stripped = auto_re.replace(&stripped, "");
    tail_re.replace(&stripped, "").into_owned()
}
