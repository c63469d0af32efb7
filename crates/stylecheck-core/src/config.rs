//! Style configuration shared by the rule engine and the formatter.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{rule_ids, Severity};

/// Required case for SQL keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCase {
    #[default]
    Upper,
    Lower,
}

impl KeywordCase {
    /// Apply this case to keyword text.
    pub fn apply(&self, keyword: &str) -> String {
        match self {
            KeywordCase::Upper => keyword.to_ascii_uppercase(),
            KeywordCase::Lower => keyword.to_ascii_lowercase(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordCase::Upper => "upper",
            KeywordCase::Lower => "lower",
        }
    }
}

/// Required case for unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// `snake_case` identifiers only.
    #[default]
    Snake,
    /// Identifiers are not checked.
    Asis,
}

/// Configuration for linting and formatting.
///
/// Every field has a default, so `{}` is a valid configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Spaces per indentation level (default: 4).
    pub indent_width: usize,

    /// Keyword case (default: upper).
    pub keyword_case: KeywordCase,

    /// Identifier case policy (default: snake).
    pub identifier_case: IdentifierCase,

    /// Flag bare `JOIN` and comma joins (default: true).
    pub require_explicit_join: bool,

    /// Flag subqueries in FROM/WHERE (default: true).
    pub require_cte_over_subquery: bool,

    /// Maximum run of consecutive blank lines (default: 1).
    pub max_blank_lines: usize,

    /// Require a comma after the last field of a multi-line field list (default: true).
    pub trailing_comma_on_last_field: bool,

    /// Line width above which CASE WHEN conditions wrap (default: 80).
    pub max_line_length: usize,

    /// Rule ids to disable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disabled_rules: Vec<String>,

    /// Per-rule severity overrides, keyed by rule id.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub severity_overrides: BTreeMap<String, Severity>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            keyword_case: KeywordCase::Upper,
            identifier_case: IdentifierCase::Snake,
            require_explicit_join: true,
            require_cte_over_subquery: true,
            max_blank_lines: 1,
            trailing_comma_on_last_field: true,
            max_line_length: 80,
            disabled_rules: Vec::new(),
            severity_overrides: BTreeMap::new(),
        }
    }
}

impl StyleConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: StyleConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check option ranges and rule references.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.indent_width) {
            return Err(ConfigError::InvalidValue {
                option: "indent_width",
                message: format!("expected 1..=16, got {}", self.indent_width),
            });
        }
        if self.max_blank_lines > 10 {
            return Err(ConfigError::InvalidValue {
                option: "max_blank_lines",
                message: format!("expected 0..=10, got {}", self.max_blank_lines),
            });
        }
        if self.max_line_length < 20 {
            return Err(ConfigError::InvalidValue {
                option: "max_line_length",
                message: format!("expected at least 20, got {}", self.max_line_length),
            });
        }
        for id in self
            .disabled_rules
            .iter()
            .chain(self.severity_overrides.keys())
        {
            if !rule_ids::is_known(id) {
                return Err(ConfigError::UnknownRule(id.clone()));
            }
        }
        Ok(())
    }

    /// Returns true if a specific rule is enabled.
    pub fn is_rule_enabled(&self, id: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == id)
    }

    /// Severity for a rule, honoring overrides.
    pub fn severity_for(&self, id: &str, default: Severity) -> Severity {
        self.severity_overrides.get(id).copied().unwrap_or(default)
    }

    /// One indentation unit.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
