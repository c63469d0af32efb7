//! JSON output formatting.

use super::lint::FileLintResult;

/// Format lint results as a JSON array of `{file, violations}` objects.
///
/// If `compact` is true, outputs minified JSON without whitespace.
pub fn format_lint_json(results: &[FileLintResult], compact: bool) -> String {
    if compact {
        serde_json::to_string(results).unwrap_or_default()
    } else {
        serde_json::to_string_pretty(results).unwrap_or_default()
    }
}
