//! Fuzz target for the tokenizer and recognizer.
//!
//! `tokenize` and `parse_sql` must never panic, and tokens must stay ordered
//! and inside the input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use questlens_core::{parse_sql, tokenize};

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        let tokenized = tokenize(sql);
        let mut last_end = 0;
        for token in &tokenized.tokens {
            assert!(token.start >= last_end && token.end() <= sql.len());
            last_end = token.end();
        }
        let _ = parse_sql(sql);
    }
});
