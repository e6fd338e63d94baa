//! Fuzz target for content assist.
//!
//! This tests that `get_suggestions()` doesn't panic for any text and cursor.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use questlens_core::{ColumnInfo, CompletionProvider, Schema, TableInfo};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    sql: String,
    cursor: u16,
}

fuzz_target!(|input: FuzzInput| {
    let schema = Schema::new(vec![TableInfo::new("trades")])
        .with_columns("trades", vec![ColumnInfo::new("price", "DOUBLE")]);
    let provider = CompletionProvider::new(schema);

    // Out-of-range and mid-character cursors are clamped, never rejected.
    let _ = provider.get_suggestions(&input.sql, usize::from(input.cursor));
});
