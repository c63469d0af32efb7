//! `--list-rules` table.

use stylecheck_core::{StyleConfig, StyleRule};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Rule")]
    id: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Severity")]
    severity: &'static str,
    #[tabled(rename = "Fix")]
    fixable: &'static str,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

/// Render the rule registry with severities and enablement resolved against
/// `config`.
pub fn format_rule_table(rules: &[Box<dyn StyleRule>], config: &StyleConfig) -> String {
    let rows = rules.iter().map(|rule| RuleRow {
        id: rule.id(),
        name: rule.name(),
        severity: config
            .severity_for(rule.id(), rule.default_severity())
            .as_str(),
        fixable: if rule.fixable() { "yes" } else { "" },
        enabled: if config.is_rule_enabled(rule.id()) {
            "yes"
        } else {
            "no"
        },
        description: rule.description(),
    });

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{table}\n")
}
