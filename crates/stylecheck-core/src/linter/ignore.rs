//! Ignore lists: fingerprints of known violations to filter out.
//!
//! A fingerprint combines the rule id with an FNV-1a hash of the violation's
//! line number and line text. It matches only while the offending line keeps
//! both its text and its line number: editing that line, or inserting or
//! deleting lines above it, re-surfaces the violation.

use std::collections::{BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{LineIndex, Violation};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Set of violation fingerprints from a previous run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IgnoreList {
    pub fingerprints: BTreeSet<String>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprints of `violations` found in `source`.
    pub fn from_violations(source: &str, violations: &[Violation]) -> Self {
        let lines = LineIndex::new(source);
        let mut hashes = LineHashes::new(source, &lines);
        Self {
            fingerprints: violations
                .iter()
                .map(|violation| hashes.fingerprint(violation))
                .collect(),
        }
    }

    /// Add the fingerprints of another list.
    pub fn extend(&mut self, other: IgnoreList) {
        self.fingerprints.extend(other.fingerprints);
    }

    pub fn contains(&self, source: &str, lines: &LineIndex, violation: &Violation) -> bool {
        self.matcher(source, lines).contains(violation)
    }

    /// Matcher for many violations of one document; each line is hashed at
    /// most once.
    pub fn matcher<'a>(&'a self, source: &'a str, lines: &'a LineIndex) -> IgnoreMatcher<'a> {
        IgnoreMatcher {
            list: self,
            hashes: LineHashes::new(source, lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|err| ConfigError::Malformed(err.to_string()))
    }

    pub fn to_json(&self) -> String {
        // A map of strings always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

pub struct IgnoreMatcher<'a> {
    list: &'a IgnoreList,
    hashes: LineHashes<'a>,
}

impl IgnoreMatcher<'_> {
    pub fn contains(&mut self, violation: &Violation) -> bool {
        if self.list.is_empty() {
            return false;
        }
        let fingerprint = self.hashes.fingerprint(violation);
        self.list.fingerprints.contains(&fingerprint)
    }
}

/// Per-line hashes of one document, computed on first use.
struct LineHashes<'a> {
    source: &'a str,
    lines: &'a LineIndex,
    cache: HashMap<usize, u64>,
}

impl<'a> LineHashes<'a> {
    fn new(source: &'a str, lines: &'a LineIndex) -> Self {
        Self {
            source,
            lines,
            cache: HashMap::new(),
        }
    }

    fn fingerprint(&mut self, violation: &Violation) -> String {
        let line = self.lines.line(violation.span.start.min(self.source.len()));
        let (source, lines) = (self.source, self.lines);
        let hash = *self
            .cache
            .entry(line)
            .or_insert_with(|| line_hash(source, lines, line));
        format!("{}:{hash:016x}", violation.rule)
    }
}

/// Stable identifier of a violation: `rule:hash`.
pub fn fingerprint(source: &str, lines: &LineIndex, violation: &Violation) -> String {
    LineHashes::new(source, lines).fingerprint(violation)
}

fn line_hash(source: &str, lines: &LineIndex, line: usize) -> u64 {
    let text = lines.line_text(source, line).trim_end();
    fnv1a(format!("{line}:{text}").as_bytes())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Span;

    fn violation(rule: &str, start: usize) -> Violation {
        Violation::error(rule, "message", Span::new(start, start + 1))
    }

    #[test]
    fn fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn fingerprint_depends_on_rule_line_and_text() {
        let sql = "select 1\nselect 1\n";
        let lines = LineIndex::new(sql);
        let first = fingerprint(sql, &lines, &violation("keyword-case", 0));
        let same_line = fingerprint(sql, &lines, &violation("keyword-case", 7));
        let second_line = fingerprint(sql, &lines, &violation("keyword-case", 9));
        let other_rule = fingerprint(sql, &lines, &violation("indentation", 0));

        assert!(first.starts_with("keyword-case:"));
        assert_eq!(first, same_line);
        assert_ne!(first, second_line);
        assert_ne!(first, other_rule);
    }

    #[test]
    fn contains_matches_unchanged_lines_only() {
        let before = "select 1\n";
        let list = IgnoreList::from_violations(before, &[violation("keyword-case", 0)]);

        let unchanged = "select 1\n\n";
        assert!(list.contains(unchanged, &LineIndex::new(unchanged), &violation("keyword-case", 0)));

        let edited = "select 2\n";
        assert!(!list.contains(edited, &LineIndex::new(edited), &violation("keyword-case", 0)));
    }

    #[test]
    fn lines_inserted_above_resurface_the_violation() {
        let before = "select 1\n";
        let list = IgnoreList::from_violations(before, &[violation("keyword-case", 0)]);

        let shifted = "-- note\nselect 1\n";
        let moved = violation("keyword-case", 8);
        assert!(!list.contains(shifted, &LineIndex::new(shifted), &moved));
    }

    #[test]
    fn matcher_reuses_line_hashes() {
        let sql = "select a from t\n";
        let found = [violation("keyword-case", 0), violation("keyword-case", 9)];
        let list = IgnoreList::from_violations(sql, &found[..1]);
        let lines = LineIndex::new(sql);
        let mut matcher = list.matcher(sql, &lines);
        assert!(found.iter().all(|v| matcher.contains(v)));
        assert!(!matcher.contains(&violation("indentation", 0)));
        assert_eq!(matcher.hashes.cache.len(), 1);
    }

    #[test]
    fn empty_list_hashes_nothing() {
        let sql = "select a from t\n";
        let lines = LineIndex::new(sql);
        let list = IgnoreList::new();
        let mut matcher = list.matcher(sql, &lines);
        assert!(!matcher.contains(&violation("keyword-case", 0)));
        assert!(matcher.hashes.cache.is_empty());
    }

    #[test]
    fn json_round_trip_and_errors() {
        let list = IgnoreList::from_violations("x", &[violation("blank-lines", 0)]);
        assert_eq!(IgnoreList::from_json(&list.to_json()).unwrap(), list);
        assert!(matches!(
            IgnoreList::from_json(r#"{"entries": []}"#),
            Err(ConfigError::Malformed(_))
        ));
    }
}
