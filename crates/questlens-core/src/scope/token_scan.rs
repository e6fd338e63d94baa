//! Token-pattern scope fallback.
//!
//! Recognizes `FROM`/`JOIN`/`UPDATE`/`INTO`/`TABLE` followed by a possibly
//! dotted name and an optional alias, and `WITH name AS (` CTE headers. Works
//! on any token stream, including text the recognizer rejects.

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{ScopeExtraction, TableRef};
use crate::lexer::{Token, TokenCategory, TokenKind};

/// Collects table references and CTE names from `tokens`.
pub fn scan_tokens(tokens: &[Token]) -> ScopeExtraction {
    let mut scope = ScopeExtraction::default();
    let mut i = 0;
    while i < tokens.len() {
        let next = match tokens[i].kind {
            TokenKind::With => {
                scan_cte_headers(tokens, i + 1, &mut scope);
                i + 1
            }
            TokenKind::From if is_bound_from(tokens, i) => i + 1,
            TokenKind::From => scan_table_refs(tokens, i + 1, Refs::AliasedList, &mut scope),
            TokenKind::Join | TokenKind::Update | TokenKind::Into => {
                scan_table_refs(tokens, i + 1, Refs::Aliased, &mut scope)
            }
            // DDL: the word after the name is an action, never an alias.
            TokenKind::Table => {
                scan_table_refs(tokens, skip_if_exists(tokens, i + 1), Refs::Bare, &mut scope)
            }
            _ => i + 1,
        };
        i = next.max(i + 1);
    }
    #[cfg(feature = "tracing")]
    trace!(tables = scope.tables.len(), ctes = scope.cte_names.len(), "scope from token scan");
    scope
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Refs {
    /// `name [alias] (, name [alias])*`
    AliasedList,
    /// `name [alias]`
    Aliased,
    /// `name`
    Bare,
}

fn kind_at(tokens: &[Token], i: usize) -> Option<TokenKind> {
    tokens.get(i).map(|t| t.kind)
}

/// Name text of an identifier-like token or a quoted table name.
fn name_at(tokens: &[Token], i: usize) -> Option<String> {
    let token = tokens.get(i)?;
    match token.kind {
        TokenKind::StringLiteral => {
            let inner = token.text.strip_prefix('\'').unwrap_or(&token.text);
            let inner = inner.strip_suffix('\'').unwrap_or(inner);
            Some(inner.replace("''", "'"))
        }
        kind if kind.is_in(TokenCategory::IdentifierLike) => Some(token.unquoted()),
        _ => None,
    }
}

/// `SAMPLE BY 1h FROM lo TO hi` and `COPY t FROM 'file'`: the `FROM` at `i`
/// opens a range bound or an import file, not a table source.
fn is_bound_from(tokens: &[Token], i: usize) -> bool {
    let before = |n: usize| i.checked_sub(n).and_then(|j| kind_at(tokens, j));
    (before(3) == Some(TokenKind::Sample) && before(2) == Some(TokenKind::By))
        || before(2) == Some(TokenKind::Copy)
}

fn skip_if_exists(tokens: &[Token], mut i: usize) -> usize {
    if kind_at(tokens, i) == Some(TokenKind::If) {
        i += 1;
        if kind_at(tokens, i) == Some(TokenKind::Not) {
            i += 1;
        }
        if kind_at(tokens, i) == Some(TokenKind::Exists) {
            i += 1;
        }
    }
    i
}

/// Reads table references of shape `refs` starting at `i`; returns the index
/// after the last consumed token.
fn scan_table_refs(
    tokens: &[Token],
    mut i: usize,
    refs: Refs,
    scope: &mut ScopeExtraction,
) -> usize {
    loop {
        let Some(mut table) = name_at(tokens, i) else {
            return i;
        };
        i += 1;
        // Keep the last segment of `schema.table`.
        while kind_at(tokens, i) == Some(TokenKind::Dot) {
            match name_at(tokens, i + 1) {
                Some(segment) => {
                    table = segment;
                    i += 2;
                }
                None => break,
            }
        }

        let mut alias = None;
        if refs != Refs::Bare {
            if kind_at(tokens, i) == Some(TokenKind::As) {
                if let Some(name) = name_at(tokens, i + 1) {
                    alias = Some(name);
                    i += 2;
                }
            } else if is_bare_alias(tokens, i) {
                alias = name_at(tokens, i);
                i += 1;
            }
        }

        scope.push_table(TableRef { table, alias });

        if refs != Refs::AliasedList || kind_at(tokens, i) != Some(TokenKind::Comma) {
            return i;
        }
        i += 1;
    }
}

fn is_bare_alias(tokens: &[Token], i: usize) -> bool {
    match kind_at(tokens, i) {
        Some(TokenKind::Pivot | TokenKind::To) | None => false,
        Some(kind) => {
            kind.is_in(TokenCategory::IdentifierLike)
                && kind_at(tokens, i + 1) != Some(TokenKind::LParen)
        }
    }
}

/// Records `name AS (` headers of a WITH clause starting at `i`.
fn scan_cte_headers(tokens: &[Token], mut i: usize, scope: &mut ScopeExtraction) {
    loop {
        let Some(name) = name_at(tokens, i) else {
            return;
        };
        if kind_at(tokens, i + 1) != Some(TokenKind::As)
            || kind_at(tokens, i + 2) != Some(TokenKind::LParen)
        {
            return;
        }
        scope.push_cte(name);
        let Some(close) = matching_paren(tokens, i + 2) else {
            return;
        };
        if kind_at(tokens, close + 1) != Some(TokenKind::Comma) {
            return;
        }
        i = close + 2;
    }
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn scan(sql: &str) -> ScopeExtraction {
        scan_tokens(&tokenize(sql).tokens)
    }

    #[test]
    fn test_from_with_aliases() {
        let scope = scan("SELECT * FROM trades t, quotes AS q WHERE");
        assert_eq!(
            scope.tables,
            vec![
                TableRef::aliased("trades", "t"),
                TableRef::aliased("quotes", "q")
            ]
        );
    }

    #[test]
    fn test_self_join() {
        let scope = scan("SELECT  FROM trades t1 JOIN trades t2 ON t1.id = t2.id");
        assert_eq!(
            scope.tables,
            vec![
                TableRef::aliased("trades", "t1"),
                TableRef::aliased("trades", "t2")
            ]
        );
    }

    #[test]
    fn test_dotted_name_keeps_last_segment() {
        let scope = scan("SELECT * FROM db.trades");
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
    }

    #[test]
    fn test_keywords_are_not_aliases() {
        let scope = scan("SELECT * FROM trades WHERE x = 1");
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
        let scope = scan("SELECT * FROM trades timestamp(ts) LATEST ON ts PARTITION BY s");
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
        let scope = scan("trades PIVOT (sum(x) FOR y IN ('a'))");
        assert!(scope.tables.is_empty());
        let scope = scan("SELECT * FROM prices PIVOT (sum(x) FOR y IN ('a'))");
        assert_eq!(scope.tables, vec![TableRef::new("prices")]);
    }

    #[test]
    fn test_sample_range_and_copy_file_are_not_tables() {
        let scope = scan(
            "SELECT ts, avg(price) FROM trades SAMPLE BY 1h FROM '2024-01-01' TO '2024-02-01'",
        );
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
        let scope = scan("COPY trades FROM 'trades.csv' WITH HEADER true");
        assert!(scope.tables.is_empty());
        let scope = scan("SELECT * FROM trades TO");
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
    }

    #[test]
    fn test_dml_and_ddl_targets() {
        let scope = scan("INSERT INTO target SELECT * FROM source");
        assert_eq!(
            scope.tables,
            vec![TableRef::new("target"), TableRef::new("source")]
        );
        let scope = scan("UPDATE trades t SET price = 1");
        assert_eq!(scope.tables, vec![TableRef::aliased("trades", "t")]);
        let scope = scan("ALTER TABLE trades ADD COLUMN x INT");
        assert_eq!(scope.tables, vec![TableRef::new("trades")]);
        let scope = scan("CREATE TABLE IF NOT EXISTS t2 (a INT)");
        assert_eq!(scope.tables, vec![TableRef::new("t2")]);
    }

    #[test]
    fn test_quoted_names() {
        let scope = scan("SELECT * FROM \"my table\" m JOIN 'other' ON 1 = 1");
        assert_eq!(
            scope.tables,
            vec![
                TableRef::aliased("my table", "m"),
                TableRef::new("other")
            ]
        );
    }

    #[test]
    fn test_cte_names_collected_separately() {
        let scope = scan("WITH a AS (SELECT * FROM x), b AS (SELECT 1) SELECT * FROM a");
        assert_eq!(scope.cte_names, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(scope.tables, vec![TableRef::new("x"), TableRef::new("a")]);
    }

    #[test]
    fn test_incomplete_input() {
        assert!(scan("SELECT * FROM").tables.is_empty());
        assert!(scan("WITH a AS (SELECT").cte_names.contains(&"a".to_string()));
    }
}
