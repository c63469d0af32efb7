//! End-to-end formatter tests: golden fixtures, layout snapshots and the
//! equivalence check.

use insta::assert_snapshot;
use rstest::rstest;
use stylecheck_core::{
    format, lint, rule_ids, verify_equivalence, Equivalence, KeywordCase, StyleConfig,
};

const GUIDE_BAD: &str = include_str!("fixtures/guide_bad.sql");
const GUIDE_GOOD: &str = include_str!("fixtures/guide_good.sql");

fn fmt(sql: &str) -> String {
    format(sql, &StyleConfig::default()).expect("format")
}

#[test]
fn guide_bad_formats_to_guide_good() {
    assert_eq!(fmt(GUIDE_BAD), GUIDE_GOOD);
}

#[test]
fn guide_good_is_a_fixed_point() {
    assert_eq!(fmt(GUIDE_GOOD), GUIDE_GOOD);
}

#[test]
fn guide_good_is_lint_clean() {
    let violations = lint(GUIDE_GOOD, &StyleConfig::default()).expect("lint");
    assert!(violations.is_empty(), "{violations:#?}");
}

#[test]
fn guide_bad_has_findings() {
    let violations = lint(GUIDE_BAD, &StyleConfig::default()).expect("lint");
    for rule in [
        rule_ids::KEYWORD_CASE,
        rule_ids::EXPLICIT_JOIN_TYPE,
        rule_ids::EXPLICIT_ALIAS,
    ] {
        assert!(
            violations.iter().any(|v| v.rule == rule),
            "expected a {rule} violation"
        );
    }
}

#[test]
fn guide_formatting_is_equivalent() {
    assert_eq!(
        verify_equivalence(GUIDE_BAD, &fmt(GUIDE_BAD)),
        Ok(Equivalence::Verified)
    );
}

#[test]
fn formatted_output_only_keeps_unfixable_findings() {
    let sql = "select * from (select a, b from t where a in (select a from u)) as s";
    let formatted = fmt(sql);
    let remaining: Vec<_> = lint(&formatted, &StyleConfig::default())
        .expect("lint")
        .into_iter()
        .map(|v| v.rule)
        .collect();
    assert!(
        remaining.iter().all(|rule| [
            rule_ids::NO_SELECT_STAR,
            rule_ids::PREFER_CTE_OVER_SUBQUERY,
        ]
        .contains(&rule.as_str())),
        "{remaining:?}"
    );
}

#[test]
fn union_layout() {
    assert_snapshot!(fmt("select a from t union all select a from u order by a limit 10"), @r"
    SELECT
        a,
    FROM t
    UNION ALL
    SELECT
        a,
    FROM u
    ORDER BY a
    LIMIT 10
    ");
}

#[test]
fn nested_from_subquery_layout() {
    assert_snapshot!(fmt("select x.a from (select a from (select a from t) y) x"), @r"
    SELECT
        x.a,
    FROM (
        SELECT
            a,
        FROM (
            SELECT
                a,
            FROM t
        ) AS y
    ) AS x
    ");
}

#[test]
fn recursive_cte_with_columns() {
    assert_snapshot!(fmt("with recursive r(n) as (select 1 union select n + 1 from r where n < 5) select n from r"), @r"
    WITH RECURSIVE r (n) AS (
        SELECT
            1,
        UNION
        SELECT
            n + 1,
        FROM r
        WHERE n < 5
    )

    SELECT
        n,
    FROM r
    ");
}

#[rstest]
#[case::distinct("select distinct a from t", "SELECT DISTINCT\n    a,\nFROM t\n")]
#[case::having(
    "select a, count(*) n from t group by a having count(*) > 1 and a is not null",
    "SELECT\n    a,\n    count(*) AS n,\nFROM t\nGROUP BY a\nHAVING count(*) > 1\n    AND a IS NOT NULL\n"
)]
#[case::cross_join("select 1 from a cross join b", "SELECT\n    1,\nFROM a\nCROSS JOIN b\n")]
#[case::comma_join("select 1 from a, b", "SELECT\n    1,\nFROM a, b\n")]
#[case::table_function("select g from generate_series(1, 3) g", "SELECT\n    g,\nFROM generate_series(1, 3) AS g\n")]
#[case::exists(
    "select 1 from t where exists (select 1 from u where u.id = t.id)",
    "SELECT\n    1,\nFROM t\nWHERE EXISTS (SELECT 1 FROM u WHERE u.id = t.id)\n"
)]
#[case::casts("select a::int, cast(b as varchar(10)) from t", "SELECT\n    a::int,\n    CAST(b AS varchar(10)),\nFROM t\n")]
#[case::order_nulls("select a from t order by a desc nulls last, b", "SELECT\n    a,\nFROM t\nORDER BY a DESC NULLS LAST, b\n")]
#[case::quoted("select \"User Id\" from `t`", "SELECT\n    \"User Id\",\nFROM `t`\n")]
fn layouts(#[case] sql: &str, #[case] expected: &str) {
    assert_eq!(fmt(sql), expected);
}

#[test]
fn lower_case_two_space_config() {
    let config = StyleConfig {
        keyword_case: KeywordCase::Lower,
        indent_width: 2,
        ..StyleConfig::default()
    };
    let formatted = format(
        "SELECT a FROM t LEFT JOIN u ON t.id = u.id AND u.ok WHERE a > 1 AND b",
        &config,
    )
    .expect("format");
    assert_eq!(
        formatted,
        "select\n  a,\nfrom t\nleft join u\n       on t.id = u.id\n      and u.ok\nwhere a > 1\n  and b\n"
    );
    assert!(lint(&formatted, &config).expect("lint").is_empty());
}

#[test]
fn comments_survive_formatting() {
    let sql = "/* header */\nselect a, -- first\n  /* about b */ b\nfrom t -- source\nwhere x = 1 -- filter\n  and y = 2;\n-- trailer\n";
    let formatted = fmt(sql);
    for comment in [
        "/* header */",
        "-- first",
        "/* about b */",
        "-- source",
        "-- filter",
        "-- trailer",
    ] {
        assert!(formatted.contains(comment), "lost {comment}:\n{formatted}");
    }
    assert_eq!(fmt(&formatted), formatted);
}

#[test]
fn inner_comments_stay_on_their_construct() {
    let sql = "select case when a = 1 -- why\nthen 2 end as x, sum(c /* inner */) as s, b\n\
               from t where id in (select id -- sub\nfrom u) and ok\n";
    let formatted = fmt(sql);
    let line_of = |needle: &str| {
        formatted
            .lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("lost {needle}:\n{formatted}"))
            .trim()
    };
    assert_eq!(line_of("-- why"), "WHEN a = 1 THEN 2 -- why");
    assert!(line_of("/* inner */").ends_with("AS s, /* inner */"));
    assert!(line_of("-- sub").starts_with("WHERE id IN ("));
    assert_eq!(line_of("b,"), "b,");
    assert_eq!(fmt(&formatted), formatted);
}

#[test]
fn long_case_condition_wraps() {
    let config = StyleConfig {
        max_line_length: 40,
        ..StyleConfig::default()
    };
    let formatted = format(
        "select case when status = 'active' and plan = 'pro' then 1 else 0 end paying from t",
        &config,
    )
    .expect("format");
    assert_snapshot!(formatted, @r"
    SELECT
        CASE
            WHEN status = 'active'
              AND plan = 'pro'
              THEN 1
            ELSE 0
        END AS paying,
    FROM t
    ");
    assert!(lint(&formatted, &config).expect("lint").is_empty());
}

#[test]
fn opaque_statements_keep_their_text() {
    let formatted = fmt("insert into t (a) values (1);\ncreate view v as select 1;");
    assert_eq!(
        formatted,
        "INSERT INTO t (a) VALUES (1);\n\nCREATE VIEW v AS SELECT 1;\n"
    );
}
