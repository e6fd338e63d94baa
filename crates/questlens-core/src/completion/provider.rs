//! The schema-bound completion entry point.

#[cfg(feature = "tracing")]
use tracing::info_span;

use super::orchestrator::content_assist;
use super::ranking::ColumnIndex;
use super::suggestions::build_suggestions;
use crate::lexer::TokenKind;
use crate::scope::{AstScopeExtractor, ScopeExtractor};
use crate::types::{AssistOptions, CompletionRequest, CompletionResponse, Schema, Suggestion};

/// Completion against one schema.
///
/// The schema and its column index are fixed at construction, so one provider
/// can serve concurrent requests.
pub struct CompletionProvider {
    schema: Schema,
    index: ColumnIndex,
    options: AssistOptions,
    extractor: Box<dyn ScopeExtractor>,
}

impl CompletionProvider {
    pub fn new(schema: Schema) -> Self {
        let schema = schema.normalized();
        let index = ColumnIndex::new(&schema);
        Self {
            schema,
            index,
            options: AssistOptions::default(),
            extractor: Box::new(AstScopeExtractor),
        }
    }

    pub fn with_options(mut self, options: AssistOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the full-parse scope extractor.
    pub fn with_scope_extractor(mut self, extractor: impl ScopeExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Ranked suggestions for `cursor_offset` in `query`. Never fails; the
    /// worst case is an empty list.
    pub fn get_suggestions(&self, query: &str, cursor_offset: usize) -> Vec<Suggestion> {
        self.complete_at(query, cursor_offset).suggestions
    }

    /// Token kinds valid at the end of `query`, unranked.
    pub fn get_next_valid_token_kinds(&self, query: &str) -> Vec<TokenKind> {
        let options = AssistOptions {
            use_scope_extractor: false,
            ..self.options
        };
        content_assist(query, query.len(), None, &options).next_token_kinds
    }

    /// Suggestions plus the prediction and scope behind them.
    pub fn complete(&self, request: &CompletionRequest) -> CompletionResponse {
        self.complete_at(&request.sql, request.cursor_offset)
    }

    fn complete_at(&self, query: &str, cursor_offset: usize) -> CompletionResponse {
        #[cfg(feature = "tracing")]
        let _span = info_span!("complete", len = query.len(), cursor_offset).entered();
        let result = content_assist(
            query,
            cursor_offset,
            Some(self.extractor.as_ref()),
            &self.options,
        );
        let suggestions = build_suggestions(&result, &self.schema, &self.index);
        CompletionResponse {
            suggestions,
            next_token_kinds: result.next_token_kinds,
            tables_in_scope: result.tables_in_scope,
            is_mid_word: result.is_mid_word,
            partial_word: result.partial_word,
            lex_errors: result.lex_errors,
        }
    }
}

/// One-shot completion for JSON callers: builds a provider from the request's
/// schema and options.
pub fn complete(request: &CompletionRequest) -> CompletionResponse {
    CompletionProvider::new(request.schema.clone())
        .with_options(request.options.unwrap_or_default())
        .complete(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScopeError;
    use crate::scope::{ScopeExtraction, TableRef};
    use crate::types::{ColumnInfo, SuggestionKind, TableInfo};

    fn provider() -> CompletionProvider {
        CompletionProvider::new(
            Schema::new(vec![TableInfo::new("trades"), TableInfo::new("orders")])
                .with_columns("Trades", vec![ColumnInfo::new("price", "DOUBLE")])
                .with_columns("orders", vec![ColumnInfo::new("status", "SYMBOL")]),
        )
    }

    struct Fixed(Vec<TableRef>);

    impl ScopeExtractor for Fixed {
        fn extract(&self, _sql: &str) -> Result<ScopeExtraction, ScopeError> {
            Ok(ScopeExtraction {
                tables: self.0.clone(),
                cte_names: Vec::new(),
            })
        }
    }

    struct Failing;

    impl ScopeExtractor for Failing {
        fn extract(&self, _sql: &str) -> Result<ScopeExtraction, ScopeError> {
            Err(ScopeError::Empty)
        }
    }

    fn column_labels(suggestions: &[Suggestion]) -> Vec<String> {
        suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Column)
            .map(|s| s.label.clone())
            .collect()
    }

    #[test]
    fn test_provider_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompletionProvider>();
    }

    #[test]
    fn test_custom_extractor_drives_scope() {
        let provider = provider().with_scope_extractor(Fixed(vec![TableRef::new("orders")]));
        let suggestions = provider.get_suggestions("SELECT  FROM trades", 7);
        assert_eq!(column_labels(&suggestions), vec!["status"]);
    }

    #[test]
    fn test_failing_extractor_falls_back_to_tokens() {
        let provider = provider().with_scope_extractor(Failing);
        let suggestions = provider.get_suggestions("SELECT  FROM trades", 7);
        assert_eq!(column_labels(&suggestions), vec!["price"]);
    }

    #[test]
    fn test_extractor_can_be_disabled() {
        let provider = provider()
            .with_scope_extractor(Fixed(vec![TableRef::new("orders")]))
            .with_options(AssistOptions {
                use_scope_extractor: false,
                ..AssistOptions::default()
            });
        let suggestions = provider.get_suggestions("SELECT  FROM trades", 7);
        assert_eq!(column_labels(&suggestions), vec!["price"]);
    }

    #[test]
    fn test_next_valid_token_kinds() {
        let kinds = provider().get_next_valid_token_kinds("SELECT * ");
        assert!(kinds.contains(&TokenKind::From));
        assert!(!kinds.contains(&TokenKind::Identifier));
    }

    #[test]
    fn test_complete_reports_scope_and_word() {
        let request = CompletionRequest {
            sql: "SELECT pr FROM trades".to_string(),
            cursor_offset: 9,
            schema: provider().schema().clone(),
            options: None,
        };
        let response = complete(&request);
        assert!(response.is_mid_word);
        assert_eq!(response.partial_word.as_deref(), Some("pr"));
        assert_eq!(response.tables_in_scope, vec![TableRef::new("trades")]);
        assert_eq!(response.suggestions[0].label, "price");
    }

    #[test]
    fn test_suggestions_are_idempotent() {
        let provider = provider();
        let sql = "SELECT price FROM trades t JOIN orders o ON ";
        assert_eq!(
            provider.get_suggestions(sql, sql.len()),
            provider.get_suggestions(sql, sql.len())
        );
    }
}
