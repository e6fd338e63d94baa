#![allow(dead_code)]

use questlens_core::{ColumnInfo, CompletionProvider, Schema, Suggestion, SuggestionKind, TableInfo};

/// `trades(symbol, price, ts)` with designated timestamp `ts`, and
/// `orders(id, status)`.
pub fn sample_schema() -> Schema {
    Schema::new(vec![
        TableInfo::new("trades").with_designated_timestamp("ts"),
        TableInfo::new("orders"),
    ])
    .with_columns(
        "trades",
        vec![
            ColumnInfo::new("symbol", "SYMBOL"),
            ColumnInfo::new("price", "DOUBLE"),
            ColumnInfo::new("ts", "TIMESTAMP"),
        ],
    )
    .with_columns(
        "orders",
        vec![
            ColumnInfo::new("id", "LONG"),
            ColumnInfo::new("status", "SYMBOL"),
        ],
    )
}

pub fn provider() -> CompletionProvider {
    CompletionProvider::new(sample_schema())
}

pub fn labels(suggestions: &[Suggestion], kind: SuggestionKind) -> Vec<&str> {
    suggestions
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.label.as_str())
        .collect()
}
