//! Style rule implementations and registry.

use super::rule::StyleRule;

pub mod blank_lines;
pub mod explicit_alias;
pub mod explicit_join_type;
pub mod identifier_case;
pub mod indentation;
pub mod keyword_case;
pub mod no_positional_group_by;
pub mod no_select_star;
pub mod prefer_cte_over_subquery;
pub mod trailing_comma;

/// Returns all available style rules.
pub fn all_rules() -> Vec<Box<dyn StyleRule>> {
    vec![
        Box::new(keyword_case::KeywordCase),
        Box::new(identifier_case::IdentifierCase),
        Box::new(trailing_comma::TrailingComma),
        Box::new(explicit_join_type::ExplicitJoinType),
        Box::new(no_select_star::NoSelectStar),
        Box::new(no_positional_group_by::NoPositionalGroupBy),
        Box::new(prefer_cte_over_subquery::PreferCteOverSubquery),
        Box::new(indentation::Indentation),
        Box::new(blank_lines::BlankLines),
        Box::new(explicit_alias::ExplicitAlias),
    ]
}
