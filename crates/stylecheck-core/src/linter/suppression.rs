//! Inline `-- stylecheck-ignore` directives.
//!
//! `-- stylecheck-ignore` suppresses every rule on the comment's line;
//! `-- stylecheck-ignore: rule-a, rule-b` suppresses only the listed rules.
//! Block comments work the same way and apply to the line they start on.

use std::collections::{HashMap, HashSet};

use crate::lexer::Token;
use crate::types::LineIndex;

const MARKER: &str = "stylecheck-ignore";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Directive {
    All,
    Rules(HashSet<String>),
}

/// Suppression directives indexed by 1-based line number.
#[derive(Debug, Clone, Default)]
pub struct SuppressionMap {
    directives: HashMap<usize, Directive>,
}

impl SuppressionMap {
    /// Collect the directives found in the comments of a token stream.
    pub fn from_tokens(tokens: &[Token<'_>], lines: &LineIndex) -> Self {
        let mut map = Self::default();
        for token in tokens.iter().filter(|token| token.kind.is_comment()) {
            let Some(directive) = parse_directive(token.text) else {
                continue;
            };
            let line = lines.line(token.span.start);
            match directive {
                Directive::All => map.suppress_all(line),
                Directive::Rules(rules) => map.suppress_rules(line, rules),
            }
        }
        map
    }

    /// Returns true if `rule` is suppressed on `line`.
    pub fn is_suppressed(&self, line: usize, rule: &str) -> bool {
        match self.directives.get(&line) {
            None => false,
            Some(Directive::All) => true,
            Some(Directive::Rules(rules)) => rules.contains(rule),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn suppress_all(&mut self, line: usize) {
        self.directives.insert(line, Directive::All);
    }

    fn suppress_rules(&mut self, line: usize, rules: HashSet<String>) {
        match self.directives.get_mut(&line) {
            Some(Directive::All) => {}
            Some(Directive::Rules(existing)) => existing.extend(rules),
            None => {
                self.directives.insert(line, Directive::Rules(rules));
            }
        }
    }
}

fn parse_directive(comment: &str) -> Option<Directive> {
    let body = comment
        .strip_prefix("--")
        .or_else(|| comment.strip_prefix("/*"))?;
    let body = body.strip_suffix("*/").unwrap_or(body).trim();
    let suffix = body.strip_prefix(MARKER)?.trim();

    let Some(list) = suffix.strip_prefix(':') else {
        // `-- stylecheck-ignore-next` and friends are not directives.
        return suffix.is_empty().then_some(Directive::All);
    };

    let rules: HashSet<String> = list
        .split(',')
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect();
    if rules.is_empty() {
        return Some(Directive::All);
    }
    Some(Directive::Rules(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn map(sql: &str) -> SuppressionMap {
        SuppressionMap::from_tokens(&tokenize(sql).unwrap(), &LineIndex::new(sql))
    }

    #[test]
    fn bare_directive_suppresses_everything_on_its_line() {
        let map = map("SELECT 1\nselect * FROM t -- stylecheck-ignore\n");
        assert!(map.is_suppressed(2, "keyword-case"));
        assert!(map.is_suppressed(2, "no-select-star"));
        assert!(!map.is_suppressed(1, "keyword-case"));
    }

    #[test]
    fn rule_list_suppresses_only_listed_rules() {
        let map = map("select * from t -- stylecheck-ignore: no-select-star, Keyword-Case");
        assert!(map.is_suppressed(1, "no-select-star"));
        assert!(map.is_suppressed(1, "keyword-case"));
        assert!(!map.is_suppressed(1, "indentation"));
    }

    #[test]
    fn block_comment_directive() {
        let map = map("SELECT * /* stylecheck-ignore: no-select-star */ FROM t");
        assert!(map.is_suppressed(1, "no-select-star"));
    }

    #[test]
    fn unrelated_comments_are_ignored() {
        assert!(map("SELECT 1 -- keep stylecheck-ignore out of prose").is_empty());
        assert!(map("SELECT 1 -- stylecheck-ignored").is_empty());
    }

    #[test]
    fn empty_rule_list_means_all() {
        assert!(map("SELECT 1 -- stylecheck-ignore:").is_suppressed(1, "blank-lines"));
    }
}
