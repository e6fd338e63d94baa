mod common;

use proptest::prelude::*;
use questlens_core::{content_assist, tokenize, AssistOptions};

proptest! {
    #[test]
    fn tokenize_is_total_and_ordered(sql in "\\PC{0,80}") {
        let tokenized = tokenize(&sql);
        let mut last_end = 0;
        for token in &tokenized.tokens {
            prop_assert!(token.len > 0, "empty token {:?}", token);
            prop_assert!(token.start >= last_end, "overlap at {:?}", token);
            prop_assert_eq!(&sql[token.start..token.end()], token.text.as_str());
            last_end = token.end();
        }
        prop_assert!(last_end <= sql.len());
    }

    #[test]
    fn tokenize_is_deterministic(sql in "[a-zA-Z0-9_ ,.()*='\";:-]{0,60}") {
        prop_assert_eq!(tokenize(&sql), tokenize(&sql));
    }

    #[test]
    fn partial_word_never_reaches_prediction(
        sql in "(SELECT|FROM|WHERE|[a-z_]{1,6}|[0-9]{1,3}|[ ,.()*=]){0,12}",
        cut in 0usize..200,
    ) {
        let cursor = cut.min(sql.len());
        let result = content_assist(&sql, cursor, None, &AssistOptions::default());
        let before = sql[..cursor].chars().next_back();
        if before.is_some_and(|c| c.is_alphanumeric()) {
            prop_assert!(result.is_mid_word);
            prop_assert!(result.tokens_before_cursor.iter().all(|t| t.end() < cursor));
        }
    }

    #[test]
    fn suggestions_are_idempotent(
        sql in "(SELECT|FROM|WHERE|JOIN|trades|orders|t|price|[ ,.()*=]){0,10}",
        cut in 0usize..120,
    ) {
        let provider = common::provider();
        let cursor = cut.min(sql.len());
        prop_assert_eq!(
            provider.get_suggestions(&sql, cursor),
            provider.get_suggestions(&sql, cursor)
        );
    }
}
