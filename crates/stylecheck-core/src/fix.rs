//! Applying violation fixes to source text.
//!
//! Fixes are text edits against the original source. They are applied
//! right-to-left so earlier offsets stay valid; a fix that overlaps one
//! already accepted is skipped and left for a later pass.

use crate::types::{Fix, Violation};

/// Result of applying fixes to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// The fixed text.
    pub text: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Number of fixes skipped because they overlapped another fix.
    pub skipped: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Apply the fixes carried by `violations` to `source`.
///
/// Identical fixes (same span and replacement) count once.
pub fn apply_fixes(source: &str, violations: &[Violation]) -> FixOutcome {
    let mut fixes: Vec<&Fix> = violations
        .iter()
        .filter_map(|violation| violation.fix.as_ref())
        .filter(|fix| fix.span.end <= source.len() && source.is_char_boundary(fix.span.start))
        .collect();
    fixes.sort_by_key(|fix| (fix.span.start, fix.span.end));
    fixes.dedup();

    let mut accepted: Vec<&Fix> = Vec::with_capacity(fixes.len());
    let mut skipped = 0;
    for fix in fixes {
        match accepted.last() {
            Some(previous) if overlaps(previous, fix) => skipped += 1,
            _ => accepted.push(fix),
        }
    }

    let mut text = source.to_string();
    for fix in accepted.iter().rev() {
        text.replace_range(fix.span.start..fix.span.end, &fix.replacement);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(applied = accepted.len(), skipped, "applied fixes");

    FixOutcome {
        text,
        applied: accepted.len(),
        skipped,
    }
}

/// `next` sorts after `previous`. An insertion directly before a replacement
/// is fine; two different insertions at one offset are not.
fn overlaps(previous: &Fix, next: &Fix) -> bool {
    if previous.span.is_empty() {
        return next.span.is_empty() && next.span.start == previous.span.start;
    }
    next.span.start < previous.span.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Span;

    fn with_fix(fix: Fix) -> Violation {
        Violation::error("test", "message", fix.span).with_fix(fix)
    }

    #[test]
    fn applies_non_overlapping_fixes() {
        let outcome = apply_fixes(
            "select a from t",
            &[
                with_fix(Fix::replace(Span::new(0, 6), "SELECT")),
                with_fix(Fix::replace(Span::new(9, 13), "FROM")),
                with_fix(Fix::insert(8, ",")),
            ],
        );
        assert_eq!(outcome.text, "SELECT a, FROM t");
        assert_eq!((outcome.applied, outcome.skipped), (3, 0));
        assert!(outcome.changed());
    }

    #[test]
    fn skips_overlapping_fixes() {
        let outcome = apply_fixes(
            "abcdef",
            &[
                with_fix(Fix::replace(Span::new(1, 4), "X")),
                with_fix(Fix::replace(Span::new(2, 5), "Y")),
                with_fix(Fix::insert(5, "Z")),
            ],
        );
        assert_eq!(outcome.text, "aXeZf");
        assert_eq!((outcome.applied, outcome.skipped), (2, 1));
    }

    #[test]
    fn identical_fixes_apply_once() {
        let fix = Fix::insert(3, ",");
        let outcome = apply_fixes("abc", &[with_fix(fix.clone()), with_fix(fix)]);
        assert_eq!(outcome.text, "abc,");
        assert_eq!((outcome.applied, outcome.skipped), (1, 0));
    }

    #[test]
    fn violations_without_fixes_are_ignored() {
        let violation = Violation::warning("test", "no fix", Span::new(0, 1));
        let outcome = apply_fixes("x", &[violation]);
        assert_eq!(outcome.text, "x");
        assert!(!outcome.changed());
    }

    #[test]
    fn insertion_before_replacement_at_same_offset() {
        let outcome = apply_fixes(
            "a join b",
            &[
                with_fix(Fix::replace(Span::new(2, 6), "JOIN")),
                with_fix(Fix::insert(2, "INNER ")),
            ],
        );
        assert_eq!(outcome.text, "a INNER JOIN b");
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn competing_insertions_keep_the_first() {
        let outcome = apply_fixes(
            "ab",
            &[with_fix(Fix::insert(1, "x")), with_fix(Fix::insert(1, "y"))],
        );
        assert_eq!(outcome.text, "axb");
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn adjacent_fixes_both_apply() {
        let outcome = apply_fixes(
            "\n\n  SELECT",
            &[
                with_fix(Fix::delete(Span::new(0, 2))),
                with_fix(Fix::replace(Span::new(2, 4), "")),
            ],
        );
        assert_eq!(outcome.text, "SELECT");
    }
}
