mod common;

use common::{labels, provider, sample_schema};
use questlens_core::{
    complete, CompletionRequest, Priority, SuggestionKind, TableRef, TokenKind,
};
use rstest::rstest;

#[test]
fn columns_of_the_from_table_rank_high() {
    let suggestions = provider().get_suggestions("SELECT  FROM trades", 7);
    let columns: Vec<_> = suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Column)
        .collect();
    let names: Vec<_> = columns.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(names, vec!["symbol", "price", "ts"]);
    assert!(columns.iter().all(|s| s.priority == Priority::High));
    assert!(!names.contains(&"id"));
    assert!(!names.contains(&"status"));
}

#[test]
fn comparison_keywords_after_an_operand() {
    let sql = "SELECT * FROM trades WHERE price ";
    let suggestions = provider().get_suggestions(sql, sql.len());
    let keywords = labels(&suggestions, SuggestionKind::Keyword);
    for expected in ["BETWEEN", "IN", "LIKE", "ILIKE", "IS"] {
        assert!(keywords.contains(&expected), "missing {expected}: {keywords:?}");
    }
    for symbol in ["&", "|", "^"] {
        assert!(
            !suggestions.iter().any(|s| s.label == symbol),
            "operator {symbol} offered"
        );
    }
}

#[test]
fn nothing_inside_a_string_literal() {
    let suggestions = provider().get_suggestions("SELECT * FROM t WHERE s = 'abc", 28);
    assert!(suggestions.is_empty());
}

#[rstest]
#[case("SELECT -- comment sy")]
#[case("SELECT * FROM trades /* pick a col")]
fn nothing_inside_a_comment(#[case] sql: &str) {
    assert!(provider().get_suggestions(sql, sql.len()).is_empty());
}

#[test]
fn every_statement_kind_after_a_cte() {
    let suggestions = provider().get_suggestions("WITH c AS (SELECT 1) ", 21);
    let keywords = labels(&suggestions, SuggestionKind::Keyword);
    assert!(keywords.contains(&"SELECT"), "{keywords:?}");
    assert!(keywords.contains(&"UPDATE"), "{keywords:?}");
    assert!(keywords.contains(&"INSERT"), "{keywords:?}");
}

#[test]
fn self_join_columns_are_alias_qualified() {
    let suggestions =
        provider().get_suggestions("SELECT  FROM trades t1 JOIN trades t2 ON t1.ts=t2.ts", 7);
    let columns = labels(&suggestions, SuggestionKind::Column);
    for expected in ["t1.symbol", "t2.symbol", "t1.price", "t2.price"] {
        assert!(columns.contains(&expected), "missing {expected}: {columns:?}");
    }
    assert!(!columns.contains(&"symbol"));
}

#[rstest]
#[case("", TokenKind::Select)]
#[case("SELECT * ", TokenKind::From)]
#[case("SELECT * FROM trades ", TokenKind::Sample)]
#[case("SELECT * FROM trades ", TokenKind::Latest)]
#[case("SELECT * FROM trades ", TokenKind::Asof)]
#[case("SELECT * FROM trades SAMPLE BY 1h ", TokenKind::Fill)]
#[case("SELECT * FROM trades SAMPLE BY 1h ", TokenKind::Align)]
#[case("CREATE TABLE t (ts TIMESTAMP) TIMESTAMP(ts) ", TokenKind::Partition)]
#[case("CREATE TABLE t (ts TIMESTAMP) TIMESTAMP(ts) PARTITION BY ", TokenKind::Day)]
#[case("INSERT ", TokenKind::Into)]
#[case("ALTER TABLE trades ", TokenKind::Add)]
#[case("SHOW ", TokenKind::Tables)]
#[case("SELECT 1; ", TokenKind::Select)]
fn next_valid_token_kinds(#[case] sql: &str, #[case] expected: TokenKind) {
    let kinds = provider().get_next_valid_token_kinds(sql);
    assert!(kinds.contains(&expected), "{sql:?} -> {kinds:?}");
}

#[rstest]
#[case("SELECT * FROM ", &["trades", "orders"])]
#[case("SELECT * FROM trades JOIN ", &["trades", "orders"])]
#[case("INSERT INTO ", &["trades", "orders"])]
#[case("UPDATE ", &["trades", "orders"])]
#[case("DROP TABLE ", &["trades", "orders"])]
fn table_positions(#[case] sql: &str, #[case] expected: &[&str]) {
    let suggestions = provider().get_suggestions(sql, sql.len());
    assert_eq!(labels(&suggestions, SuggestionKind::Table), expected);
    assert!(labels(&suggestions, SuggestionKind::Column).is_empty());
}

#[rstest]
#[case("SELECT tr", "tr")]
#[case("SELECT * FROM tra", "tra")]
#[case("SELECT * FROM trades WHERE sym", "sym")]
fn mid_word_offers_functions_with_names(#[case] sql: &str, #[case] word: &str) {
    let response = complete(&CompletionRequest {
        sql: sql.to_string(),
        cursor_offset: sql.len(),
        schema: sample_schema(),
        options: None,
    });
    assert!(response.is_mid_word);
    assert_eq!(response.partial_word.as_deref(), Some(word));
    assert!(!labels(&response.suggestions, SuggestionKind::Function).is_empty());
}

#[test]
fn suggestions_sort_by_priority() {
    let suggestions = provider().get_suggestions("SELECT p FROM trades", 8);
    assert!(suggestions
        .windows(2)
        .all(|pair| pair[0].priority <= pair[1].priority));
}

#[test]
fn suggestions_have_unique_kind_and_label() {
    let sql = "SELECT  FROM trades t1 JOIN trades t2 ON t1.ts=t2.ts";
    let suggestions = provider().get_suggestions(sql, 7);
    let mut seen = std::collections::HashSet::new();
    for s in &suggestions {
        assert!(seen.insert((s.kind, s.label.clone())), "duplicate {}", s.label);
    }
}

#[test]
fn scope_survives_questdb_only_syntax() {
    let sql = "SELECT  FROM trades t LATEST ON ts PARTITION BY symbol";
    let response = provider().complete(&CompletionRequest {
        sql: sql.to_string(),
        cursor_offset: 7,
        schema: sample_schema(),
        options: None,
    });
    assert_eq!(response.tables_in_scope, vec![TableRef::aliased("trades", "t")]);
    assert!(labels(&response.suggestions, SuggestionKind::Column).contains(&"price"));
}

#[test]
fn qualified_columns_after_alias_dot() {
    let sql = "SELECT t. FROM trades t";
    let suggestions = provider().get_suggestions(sql, 9);
    assert_eq!(
        labels(&suggestions, SuggestionKind::Column),
        vec!["symbol", "price", "ts"]
    );
    assert!(labels(&suggestions, SuggestionKind::Keyword).is_empty());
}

#[test]
fn request_round_trips_through_json() {
    let json = r#"{
        "sql": "SELECT  FROM orders",
        "cursorOffset": 7,
        "schema": {
            "tables": [{ "name": "orders" }],
            "columns": { "orders": [{ "name": "status", "dataType": "SYMBOL" }] }
        }
    }"#;
    let request: CompletionRequest = serde_json::from_str(json).unwrap();
    let response = complete(&request);
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["suggestions"][0]["label"], "status");
    assert_eq!(value["suggestions"][0]["kind"], "column");
    assert_eq!(value["isMidWord"], false);
}
