//! Reserved words recognized by the lexer.
//!
//! Only words the grammar reserves are classified as keywords. Contextual
//! words such as `FIRST`, `LAST` or type names stay identifiers so that
//! column names like `first` or `date` keep working.

/// Reserved words, upper-case and sorted for binary search.
pub const KEYWORDS: &[&str] = &[
    "ALL",
    "ALTER",
    "AND",
    "AS",
    "ASC",
    "BETWEEN",
    "BY",
    "CASE",
    "CAST",
    "CREATE",
    "CROSS",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "DELETE",
    "DESC",
    "DISTINCT",
    "DROP",
    "ELSE",
    "END",
    "EXCEPT",
    "EXISTS",
    "FALSE",
    "FOLLOWING",
    "FROM",
    "FULL",
    "GROUP",
    "HAVING",
    "ILIKE",
    "IN",
    "INNER",
    "INSERT",
    "INTERSECT",
    "INTERVAL",
    "INTO",
    "IS",
    "JOIN",
    "LEFT",
    "LIKE",
    "LIMIT",
    "NOT",
    "NULL",
    "NULLS",
    "OFFSET",
    "ON",
    "OR",
    "ORDER",
    "OUTER",
    "OVER",
    "PARTITION",
    "PRECEDING",
    "RECURSIVE",
    "RIGHT",
    "ROWS",
    "SELECT",
    "SET",
    "TABLE",
    "THEN",
    "TRUE",
    "UNBOUNDED",
    "UNION",
    "UPDATE",
    "USING",
    "VALUES",
    "VIEW",
    "WHEN",
    "WHERE",
    "WITH",
];

/// Returns true if `word` is a reserved word (case-insensitive).
pub fn is_keyword(word: &str) -> bool {
    if word.len() > 17 || !word.is_ascii() {
        return false;
    }
    let upper = word.to_ascii_uppercase();
    KEYWORDS.binary_search(&upper.as_str()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_sorted_and_upper() {
        assert!(KEYWORDS.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(KEYWORDS
            .iter()
            .all(|kw| kw.chars().all(|c| c.is_ascii_uppercase() || c == '_')));
        assert!(KEYWORDS.iter().all(|kw| kw.len() <= 17));
    }

    #[test]
    fn test_is_keyword_case_insensitive() {
        assert!(is_keyword("select"));
        assert!(is_keyword("Join"));
        assert!(is_keyword("current_timestamp"));
        assert!(!is_keyword("first"));
        assert!(!is_keyword("users"));
        assert!(!is_keyword("sélect"));
    }
}
