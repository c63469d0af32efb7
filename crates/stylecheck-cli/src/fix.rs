//! In-place auto-fix of lint violations.
//!
//! Fixes are applied in passes so that fixes skipped for overlapping an
//! accepted one get another chance on the re-linted text. A document whose
//! fixed text ends up with more violations than it started with is left
//! untouched.

use stylecheck_core::{apply_fixes, LexError, Linter};

/// Upper bound on fix passes per document.
pub const MAX_FIX_PASSES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixReport {
    /// Fixed text, or the original when nothing applied.
    pub text: String,
    /// Number of fixes applied across all passes.
    pub applied: usize,
    /// Violations left in `text`.
    pub remaining: usize,
    /// Fixing increased the violation count, so nothing was kept.
    pub skipped_due_to_regression: bool,
}

impl FixReport {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }

    fn unchanged(source: &str, remaining: usize, regressed: bool) -> Self {
        Self {
            text: source.to_string(),
            applied: 0,
            remaining,
            skipped_due_to_regression: regressed,
        }
    }
}

/// Apply fixes to `source` until nothing changes or the pass limit is hit.
pub fn fix_document(linter: &Linter, source: &str) -> Result<FixReport, LexError> {
    let initial = linter.lint(source)?;
    let mut violations = initial.clone();
    let mut text = source.to_string();
    let mut applied = 0;

    for pass in 0..MAX_FIX_PASSES {
        let outcome = apply_fixes(&text, &violations);
        if !outcome.changed() {
            break;
        }
        tracing::debug!(pass, applied = outcome.applied, skipped = outcome.skipped, "fix pass");

        let Ok(next) = linter.lint(&outcome.text) else {
            tracing::warn!("fixed text no longer tokenizes; discarding fixes");
            return Ok(FixReport::unchanged(source, initial.len(), true));
        };
        applied += outcome.applied;
        text = outcome.text;
        violations = next;
    }

    if violations.len() > initial.len() {
        return Ok(FixReport::unchanged(source, initial.len(), true));
    }

    Ok(FixReport {
        text,
        applied,
        remaining: violations.len(),
        skipped_due_to_regression: false,
    })
}
