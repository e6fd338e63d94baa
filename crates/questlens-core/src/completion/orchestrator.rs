//! Content assist: from text and cursor to predicted token kinds and scope.
//!
//! Prediction answers a grammar-shaped question ("what may follow these
//! tokens under this rule"). This module turns it into a cursor-shaped one:
//! it decides which tokens are the prefix, which rule to predict from, and
//! corrects for noise and blind spots of exhaustive prediction.

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LexError;
use crate::grammar::{self, Rule};
use crate::lexer::{tokenize, Token, TokenCategory, TokenKind};
use crate::recognizer::{predict_next_tokens_in, Prediction};
use crate::scope::{scan_tokens, ScopeExtraction, ScopeExtractor, TableRef};
use crate::types::AssistOptions;

/// Maximum SQL input size (10MB) handled by content assist.
const MAX_SQL_LENGTH: usize = 10 * 1024 * 1024;

/// Characters after which the cursor starts a new word.
const WORD_BOUNDARY_CHARS: &str = "()[],;.=<>+-*/%'\"|&^~!@:";

/// Statement rules that may follow a WITH clause.
const CTE_STATEMENT_RULES: &[Rule] = &[
    Rule::SelectStatement,
    Rule::InsertStatement,
    Rule::UpdateStatement,
];

/// Which kinds of name the prediction expects at an identifier position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierContext {
    pub column: bool,
    pub table: bool,
    pub function: bool,
    pub data_type: bool,
    /// An identifier with no naming rule around it, e.g. after the cost bound.
    pub generic: bool,
}

impl IdentifierContext {
    fn record(&mut self, prediction: &Prediction) {
        match prediction.innermost_rule() {
            Some(Rule::ColumnReference) => self.column = true,
            Some(Rule::TableName | Rule::QualifiedStar) => self.table = true,
            Some(Rule::FunctionName) => self.function = true,
            Some(Rule::DataType) => self.data_type = true,
            // A new name: nothing existing to suggest.
            Some(Rule::Name) => {}
            _ => self.generic = true,
        }
    }

    pub fn wants_columns(&self) -> bool {
        self.column || self.generic
    }

    pub fn wants_tables(&self) -> bool {
        self.table || self.column || self.generic
    }
}

/// Everything the suggestion builder needs about one cursor position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentAssistResult {
    /// Distinct predicted kinds, in prediction order.
    pub next_token_kinds: Vec<TokenKind>,
    pub predictions: Vec<Prediction>,
    pub identifier_context: IdentifierContext,
    pub tables_in_scope: Vec<TableRef>,
    pub cte_names: Vec<String>,
    /// Tokens the prediction ran on (the partial word excluded).
    pub tokens_before_cursor: Vec<Token>,
    pub is_mid_word: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_word: Option<String>,
    /// Name before a trailing `.` in the prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
    /// Tokens of the whole text.
    pub all_tokens: Vec<Token>,
    pub lex_errors: Vec<LexError>,
}

/// Runs content assist for `cursor` in `text`.
///
/// Never fails: any prediction error leaves `next_token_kinds` empty, and a
/// failing `extractor` is replaced by the token scan.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(text, extractor, options), fields(len = text.len()))
)]
pub fn content_assist(
    text: &str,
    cursor: usize,
    extractor: Option<&dyn ScopeExtractor>,
    options: &AssistOptions,
) -> ContentAssistResult {
    if text.len() > MAX_SQL_LENGTH {
        #[cfg(feature = "tracing")]
        debug!(len = text.len(), "text too large for content assist");
        return ContentAssistResult::default();
    }
    let cursor = floor_char_boundary(text, cursor);

    let full = tokenize(text);
    if inside_string_literal(&full.tokens, cursor)
        || full.comments.iter().any(|c| c.covers(cursor))
    {
        #[cfg(feature = "tracing")]
        trace!(cursor, "cursor inside a string literal or comment");
        return ContentAssistResult {
            lex_errors: full.errors,
            ..ContentAssistResult::default()
        };
    }

    let before = &text[..cursor];
    let mut prefix = tokenize(before).tokens;
    let is_mid_word = before
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_whitespace() && !WORD_BOUNDARY_CHARS.contains(c));
    let partial_word = if is_mid_word && prefix.last().is_some_and(|t| t.end() == cursor) {
        prefix.pop().map(|t| t.text)
    } else {
        None
    };

    let predictions = predict(&prefix, options);
    let next_token_kinds = distinct_kinds(&predictions);
    let mut identifier_context = IdentifierContext::default();
    for prediction in predictions
        .iter()
        .filter(|p| p.next_token_kind == TokenKind::Identifier)
    {
        identifier_context.record(prediction);
    }

    let mut scope = resolve_scope(text, &full.tokens, extractor, options);
    let qualifier = trailing_qualifier(&prefix);
    if scope.tables.is_empty() {
        if let Some(table) = &qualifier {
            #[cfg(feature = "tracing")]
            trace!(table = %table, "implicit table from qualifier");
            scope.push_table(TableRef::new(table.clone()));
        }
    }

    ContentAssistResult {
        next_token_kinds,
        predictions,
        identifier_context,
        tables_in_scope: scope.tables,
        cte_names: scope.cte_names,
        tokens_before_cursor: prefix,
        is_mid_word,
        partial_word,
        qualifier,
        all_tokens: full.tokens,
        lex_errors: full.errors,
    }
}

fn floor_char_boundary(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

/// Strictly inside a string literal, or anywhere after an unclosed quote.
fn inside_string_literal(tokens: &[Token], cursor: usize) -> bool {
    tokens.iter().any(|t| {
        t.kind == TokenKind::StringLiteral
            && t.start < cursor
            && (cursor < t.end() || t.unterminated)
    })
}

fn distinct_kinds(predictions: &[Prediction]) -> Vec<TokenKind> {
    let mut kinds = Vec::new();
    for p in predictions {
        if !kinds.contains(&p.next_token_kind) {
            kinds.push(p.next_token_kind);
        }
    }
    kinds
}

fn predict(prefix: &[Token], options: &AssistOptions) -> Vec<Prediction> {
    if prefix.len() > options.max_prediction_tokens {
        #[cfg(feature = "tracing")]
        debug!(
            tokens = prefix.len(),
            limit = options.max_prediction_tokens,
            "prefix over cost bound, predicting a bare identifier"
        );
        return vec![Prediction {
            next_token_kind: TokenKind::Identifier,
            rule_stack: Vec::new(),
        }];
    }

    let rule = if prefix.iter().any(|t| t.kind == TokenKind::Semicolon) {
        Rule::Statements
    } else {
        Rule::Statement
    };
    let run = |rule: Rule, tokens: &[Token]| {
        predict_next_tokens_in(grammar::questdb(), rule, tokens, options.max_prediction_steps)
    };

    let mut predictions = match run(rule, prefix) {
        Ok(predictions) => filter_catch_all(predictions),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_err, "prediction failed");
            return Vec::new();
        }
    };

    if prefix.first().is_some_and(|t| t.kind == TokenKind::With) {
        for seed in CTE_STATEMENT_RULES {
            match run(*seed, prefix) {
                Ok(more) => merge(&mut predictions, more),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    debug!(rule = %seed, error = %_err, "CTE probe failed");
                }
            }
        }
    }

    if !predictions.is_empty()
        && predictions
            .iter()
            .all(|p| p.passes_through(Rule::QualifiedStar))
    {
        if let Some(collapsed) = collapse_qualified_run(prefix) {
            if let Ok(more) = run(rule, &collapsed) {
                merge(&mut predictions, filter_catch_all(more));
            }
        }
    }

    predictions
}

/// Whether the first `statement` on the stack opens a catch-all form.
fn is_catch_all(prediction: &Prediction) -> bool {
    let stack = &prediction.rule_stack;
    stack
        .iter()
        .position(|r| *r == Rule::Statement)
        .and_then(|i| stack.get(i + 1))
        .is_some_and(|r| r.is_catch_all_statement())
}

fn filter_catch_all(predictions: Vec<Prediction>) -> Vec<Prediction> {
    if predictions.iter().all(is_catch_all) {
        return predictions;
    }
    predictions.into_iter().filter(|p| !is_catch_all(p)).collect()
}

fn merge(into: &mut Vec<Prediction>, more: Vec<Prediction>) {
    for p in more {
        if !into.contains(&p) {
            into.push(p);
        }
    }
}

fn is_name(token: &Token) -> bool {
    token.kind.is_in(TokenCategory::IdentifierLike)
}

/// Rewrites a trailing `name (. name)+` run, optionally followed by `.`, as a
/// single identifier so plain column paths become visible again.
fn collapse_qualified_run(prefix: &[Token]) -> Option<Vec<Token>> {
    let trailing_dot = prefix.last().is_some_and(|t| t.kind == TokenKind::Dot);
    let end = prefix.len() - usize::from(trailing_dot);
    let mut start = end.checked_sub(1)?;
    if !is_name(&prefix[start]) {
        return None;
    }
    while start >= 2 && prefix[start - 1].kind == TokenKind::Dot && is_name(&prefix[start - 2]) {
        start -= 2;
    }
    if start == end - 1 {
        return None;
    }

    let run = &prefix[start..end];
    let text: String = run.iter().map(|t| t.text.as_str()).collect();
    let mut collapsed = prefix[..start].to_vec();
    collapsed.push(Token::new(TokenKind::Identifier, text, run[0].start));
    collapsed.extend_from_slice(&prefix[end..]);
    Some(collapsed)
}

/// The name in a trailing `name .` of the prefix.
fn trailing_qualifier(prefix: &[Token]) -> Option<String> {
    match prefix {
        [.., name, dot] if dot.kind == TokenKind::Dot && is_name(name) => Some(name.unquoted()),
        _ => None,
    }
}

fn resolve_scope(
    text: &str,
    tokens: &[Token],
    extractor: Option<&dyn ScopeExtractor>,
    options: &AssistOptions,
) -> ScopeExtraction {
    if let Some(extractor) = extractor.filter(|_| options.use_scope_extractor) {
        match extractor.extract(text) {
            Ok(scope) => return scope,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                trace!(error = %_err, "scope extractor failed, scanning tokens");
            }
        }
    }
    scan_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::AstScopeExtractor;

    fn assist(text: &str) -> ContentAssistResult {
        content_assist(
            text,
            text.len(),
            Some(&AstScopeExtractor),
            &AssistOptions::default(),
        )
    }

    #[test]
    fn cursor_inside_string_yields_nothing() {
        let text = "SELECT * FROM t WHERE s = 'abc";
        let result = content_assist(text, 28, None, &AssistOptions::default());
        assert!(result.next_token_kinds.is_empty());

        let text = "SELECT 'abc' ";
        let result = content_assist(text, 9, None, &AssistOptions::default());
        assert!(result.next_token_kinds.is_empty());
        let result = content_assist(text, text.len(), None, &AssistOptions::default());
        assert!(!result.next_token_kinds.is_empty());
    }

    #[test]
    fn cursor_inside_comment_yields_nothing() {
        let result = assist("SELECT -- comment sy");
        assert!(result.next_token_kinds.is_empty());
        assert_eq!(result.identifier_context, IdentifierContext::default());

        let result = assist("SELECT /* note");
        assert!(result.next_token_kinds.is_empty());

        let text = "SELECT /* a */ ";
        let result = content_assist(text, 10, None, &AssistOptions::default());
        assert!(result.next_token_kinds.is_empty());
        let result = content_assist(text, text.len(), None, &AssistOptions::default());
        assert!(!result.next_token_kinds.is_empty());

        let result = assist("SELECT -- note\n");
        assert!(!result.next_token_kinds.is_empty());
    }

    #[test]
    fn mid_word_drops_the_partial_token() {
        let result = assist("SELECT * FROM tra");
        assert!(result.is_mid_word);
        assert_eq!(result.partial_word.as_deref(), Some("tra"));
        assert_eq!(result.tokens_before_cursor.len(), 3);
        assert!(result.identifier_context.table);
    }

    #[test]
    fn boundary_characters_end_words() {
        for text in ["SELECT (", "SELECT a,", "SELECT t.", "SELECT a = "] {
            let result = assist(text);
            assert!(!result.is_mid_word, "{text}");
            assert!(result.partial_word.is_none());
        }
    }

    #[test]
    fn catch_all_predictions_are_filtered() {
        let result = assist("");
        assert!(result.next_token_kinds.contains(&TokenKind::Select));
        assert!(!result.predictions.iter().any(is_catch_all));
        assert!(!result.identifier_context.table);
    }

    #[test]
    fn catch_all_alone_is_kept() {
        let result = assist("trades ");
        assert!(result.next_token_kinds.contains(&TokenKind::Where));
        assert!(result.next_token_kinds.contains(&TokenKind::Pivot));
    }

    #[test]
    fn catch_all_detection_looks_at_the_top_statement() {
        let nested = Prediction {
            next_token_kind: TokenKind::Where,
            rule_stack: vec![
                Rule::Statement,
                Rule::ExplainStatement,
                Rule::Statement,
                Rule::ImplicitSelect,
            ],
        };
        assert!(!is_catch_all(&nested));
        let top = Prediction {
            next_token_kind: TokenKind::Where,
            rule_stack: vec![Rule::Statement, Rule::ImplicitSelect],
        };
        assert!(is_catch_all(&top));
    }

    #[test]
    fn cte_prefix_reaches_every_statement_kind() {
        let result = assist("WITH c AS (SELECT 1) ");
        for kind in [TokenKind::Select, TokenKind::Insert, TokenKind::Update] {
            assert!(result.next_token_kinds.contains(&kind), "missing {kind:?}");
        }
        assert_eq!(result.cte_names, vec!["c".to_string()]);
    }

    #[test]
    fn collapses_qualified_runs() {
        let tokens = tokenize("SELECT a.b.").tokens;
        let collapsed = collapse_qualified_run(&tokens).unwrap();
        let texts: Vec<_> = collapsed.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["SELECT", "a.b", "."]);
        assert_eq!(collapsed[1].kind, TokenKind::Identifier);

        assert!(collapse_qualified_run(&tokenize("SELECT a.").tokens).is_none());
        assert!(collapse_qualified_run(&tokenize("SELECT 1").tokens).is_none());
    }

    #[test]
    fn qualified_star_only_prefix_gets_column_paths() {
        let result = assist("SELECT a.b.");
        assert!(result.next_token_kinds.contains(&TokenKind::Star));
        assert!(result.identifier_context.column);
    }

    #[test]
    fn cost_bound_degrades_to_identifier() {
        let options = AssistOptions {
            max_prediction_tokens: 3,
            ..AssistOptions::default()
        };
        let text = "SELECT a, b, c FROM ";
        let result = content_assist(text, text.len(), None, &options);
        assert_eq!(result.next_token_kinds, vec![TokenKind::Identifier]);
        assert!(result.identifier_context.generic);
    }

    #[test]
    fn prediction_budget_failure_is_empty() {
        let options = AssistOptions {
            max_prediction_steps: 5,
            ..AssistOptions::default()
        };
        let result = content_assist("SELECT ", 7, None, &options);
        assert!(result.next_token_kinds.is_empty());
    }

    #[test]
    fn statements_rule_after_semicolon() {
        let result = assist("SELECT 1; ");
        assert!(result.next_token_kinds.contains(&TokenKind::Select));
        assert!(result
            .predictions
            .iter()
            .all(|p| p.rule_stack.first() == Some(&Rule::Statements)));
    }

    #[test]
    fn scope_falls_back_to_token_scan() {
        let result = assist("SELECT * FROM trades t SAMPLE BY 1h WHERE ");
        assert_eq!(result.tables_in_scope, vec![TableRef::aliased("trades", "t")]);
    }

    #[test]
    fn implicit_table_from_trailing_qualifier() {
        let result = assist("SELECT trades.");
        assert_eq!(result.qualifier.as_deref(), Some("trades"));
        assert_eq!(result.tables_in_scope, vec![TableRef::new("trades")]);
    }

    #[test]
    fn cursor_is_clamped_to_char_boundary() {
        let text = "SELECT 'é' ";
        let result = content_assist(text, 9, None, &AssistOptions::default());
        assert!(result.next_token_kinds.is_empty());
        let result = content_assist(text, 100, None, &AssistOptions::default());
        assert!(!result.next_token_kinds.is_empty());
    }
}
