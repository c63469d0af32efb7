//! Linter integration tests through the public API.

use rstest::rstest;
use stylecheck_core::{
    apply_fixes, format, lint, lint_with_ignore, rule_ids, IgnoreList, Linter, Severity,
    StyleConfig, Violation,
};

fn lint_default(sql: &str) -> Vec<Violation> {
    lint(sql, &StyleConfig::default()).expect("lint")
}

fn of_rule<'a>(violations: &'a [Violation], rule: &str) -> Vec<&'a Violation> {
    violations.iter().filter(|v| v.rule == rule).collect()
}

#[test]
fn lower_case_keywords_are_reported_with_fixes() {
    let violations = lint_default("select id from t\n");
    let found = of_rule(&violations, rule_ids::KEYWORD_CASE);
    assert_eq!(found.len(), 2);
    assert_eq!((found[0].line, found[0].column), (1, 1));
    assert_eq!((found[1].line, found[1].column), (1, 11));
    assert!(found.iter().all(|v| v.fix.is_some() && v.severity == Severity::Error));
}

#[test]
fn missing_comma_is_reported_on_the_field_line() {
    let violations = lint_default("SELECT a,\nb\nFROM t\n");
    let found = of_rule(&violations, rule_ids::TRAILING_COMMA);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].line, 2);
}

#[rstest]
#[case::bare_join("SELECT a.x FROM a JOIN b ON a.id = b.id\n", 1)]
#[case::inner_join("SELECT a.x FROM a INNER JOIN b ON a.id = b.id\n", 0)]
#[case::left_join("SELECT a.x FROM a LEFT OUTER JOIN b ON a.id = b.id\n", 0)]
fn explicit_join_type(#[case] sql: &str, #[case] expected: usize) {
    let violations = lint_default(sql);
    assert_eq!(of_rule(&violations, rule_ids::EXPLICIT_JOIN_TYPE).len(), expected);
}

#[rstest]
#[case::star("SELECT *\nFROM t\n", rule_ids::NO_SELECT_STAR)]
#[case::positional("SELECT a FROM t GROUP BY 1\n", rule_ids::NO_POSITIONAL_GROUP_BY)]
#[case::subquery("SELECT a FROM (SELECT a FROM t) AS s\n", rule_ids::PREFER_CTE_OVER_SUBQUERY)]
#[case::implicit_alias("SELECT a b FROM t\n", rule_ids::EXPLICIT_ALIAS)]
#[case::identifier("SELECT userId FROM t\n", rule_ids::IDENTIFIER_CASE)]
#[case::indentation("SELECT\n  a,\nFROM t\n", rule_ids::INDENTATION)]
#[case::blank_lines("SELECT 1;\n\n\n\nSELECT 2;\n", rule_ids::BLANK_LINES)]
fn rule_fires(#[case] sql: &str, #[case] rule: &str) {
    let violations = lint_default(sql);
    assert!(
        !of_rule(&violations, rule).is_empty(),
        "expected {rule} in {violations:#?}"
    );
}

#[test]
fn fixing_a_bare_join_clears_the_document() {
    let sql = "SELECT\n    a.x,\nFROM a\nJOIN b\n        ON a.id = b.id\n";
    let violations = lint_default(sql);
    assert_eq!(violations.len(), 1, "{violations:#?}");

    let outcome = apply_fixes(sql, &violations);
    assert_eq!(
        outcome.text,
        "SELECT\n    a.x,\nFROM a\nINNER JOIN b\n        ON a.id = b.id\n"
    );
    assert!(lint_default(&outcome.text).is_empty());
}

#[test]
fn fixes_repair_keyword_case_and_commas() {
    let sql = "select\n    a,\n    b\nfrom t\n";
    let outcome = apply_fixes(sql, &lint_default(sql));
    assert_eq!(outcome.text, "SELECT\n    a,\n    b,\nFROM t\n");
    assert!(lint_default(&outcome.text).is_empty());
}

#[test]
fn formatter_output_passes_the_linter() {
    let sql = "select a, b total from t join u on t.id = u.id and t.k = u.k where x > 1 order by a";
    let formatted = format(sql, &StyleConfig::default()).expect("format");
    let violations = lint_default(&formatted);
    assert!(violations.is_empty(), "{formatted}\n{violations:#?}");
}

#[test]
fn suppression_comment_silences_one_rule() {
    let sql = "SELECT *\nFROM t -- stylecheck-ignore: no-select-star\n";
    assert_eq!(of_rule(&lint_default(sql), rule_ids::NO_SELECT_STAR).len(), 1);

    let sql = "SELECT *, -- stylecheck-ignore: no-select-star\nFROM t\n";
    assert!(lint_default(sql).is_empty());
}

#[test]
fn baseline_matches_unchanged_lines() {
    let config = StyleConfig::default();
    let sql = "SELECT *,\nFROM t\n";
    let baseline = IgnoreList::from_violations(sql, &lint(sql, &config).expect("lint"));
    assert_eq!(baseline.len(), 1);

    let edited = "SELECT *,\nFROM u\n";
    assert!(lint_with_ignore(edited, &config, &baseline)
        .expect("lint")
        .is_empty());

    let rewritten = "SELECT *, id,\nFROM t\n";
    assert_eq!(
        lint_with_ignore(rewritten, &config, &baseline)
            .expect("lint")
            .len(),
        1
    );

    let restored = IgnoreList::from_json(&baseline.to_json()).expect("json");
    assert_eq!(restored, baseline);
}

#[test]
fn linter_reuses_its_rule_set() {
    let linter = Linter::new(StyleConfig::default()).expect("config");
    assert_eq!(linter.rules().len(), rule_ids::ALL.len());
    let first = linter.lint("select 1\n").expect("lint");
    let second = linter.lint("select 1\n").expect("lint");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn single_line_select_lists_need_a_trailing_comma() {
    let sql = "SELECT id, name FROM users\n";
    let violations = lint_default(sql);
    let found = of_rule(&violations, rule_ids::TRAILING_COMMA);
    assert_eq!(found.len(), 1, "{violations:#?}");
    assert_ne!(format(sql, &StyleConfig::default()).expect("format"), sql);

    let outcome = apply_fixes(sql, &violations);
    assert_eq!(outcome.text, "SELECT id, name, FROM users\n");
    assert!(lint_default(&outcome.text).is_empty());
}

#[test]
fn parse_error_is_the_only_finding_for_broken_statement() {
    let violations = lint_default("SELECT a FROM WHERE;\nselect b from t;\n");
    assert_eq!(violations[0].rule, rule_ids::PARSE_ERROR);
    assert_eq!(of_rule(&violations, rule_ids::KEYWORD_CASE).len(), 3);
}
