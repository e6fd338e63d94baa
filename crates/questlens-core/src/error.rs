//! Error types for tokenizing, parsing, prediction and scope extraction.
//!
//! # Error Handling Strategy
//!
//! None of these errors abort a completion request:
//!
//! - [`LexError`]: an unrecognized span. The lexer skips one character and keeps going.
//! - [`ParseError`]: a statement that does not match the grammar. The parser
//!   resynchronizes at a statement boundary and reports every error it met.
//! - [`PredictionError`]: prediction gave up. Content assist turns it into an
//!   empty prediction.
//! - [`ScopeError`]: the full-parse scope extractor failed. Content assist falls
//!   back to scanning tokens for table references.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::lexer::TokenKind;

/// Category of lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LexErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedQuotedIdentifier,
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexErrorKind::UnexpectedCharacter => "unexpected character",
            LexErrorKind::UnterminatedString => "unterminated string literal",
            LexErrorKind::UnterminatedQuotedIdentifier => "unterminated quoted identifier",
            LexErrorKind::UnterminatedComment => "unterminated block comment",
        })
    }
}

/// A span of input the lexer could not turn into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[error("{kind} {text:?} at offset {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    /// Byte offset of the offending text.
    pub offset: usize,
    pub text: String,
}

impl LexError {
    pub fn new(kind: LexErrorKind, offset: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            text: text.into(),
        }
    }
}

/// Category of parse error for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// No statement form starts with the token.
    NoViableAlternative,
    /// A statement started but a later token did not fit.
    MismatchedToken,
    /// Input ended inside a statement.
    UnexpectedEof,
    /// Nesting exceeded the recognizer's depth limit.
    TooDeep,
}

/// A statement that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Byte offset of the offending token, or the input length at end of input.
    pub offset: usize,
    /// Text of the offending token, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<String>,
    /// Kinds that would have been accepted at `offset`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected: Vec<TokenKind>,
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        offset: usize,
        found: Option<String>,
        expected: Vec<TokenKind>,
    ) -> Self {
        let message = Self::describe(kind, found.as_deref(), &expected);
        Self {
            kind,
            message,
            offset,
            found,
            expected,
        }
    }

    fn describe(kind: ParseErrorKind, found: Option<&str>, expected: &[TokenKind]) -> String {
        const SHOWN: usize = 8;
        let found = found.map_or_else(|| "end of input".to_string(), |f| format!("'{f}'"));
        let mut expected_text = expected
            .iter()
            .take(SHOWN)
            .map(|k| k.text())
            .collect::<Vec<_>>()
            .join(", ");
        if expected.len() > SHOWN {
            expected_text.push_str(", ...");
        }
        match kind {
            ParseErrorKind::NoViableAlternative => {
                format!("no statement can start with {found}")
            }
            ParseErrorKind::TooDeep => format!("expression nested too deeply at {found}"),
            ParseErrorKind::MismatchedToken | ParseErrorKind::UnexpectedEof => {
                if expected_text.is_empty() {
                    format!("unexpected {found}")
                } else {
                    format!("expected one of {expected_text}, found {found}")
                }
            }
        }
    }
}

/// Prediction could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// Exploration exceeded its step budget.
    #[error("prediction exceeded its budget of {budget} steps")]
    BudgetExceeded { budget: usize },

    /// A rule name that the grammar does not define.
    #[error("unknown grammar rule: {0}")]
    UnknownRule(String),
}

/// The scope extractor could not produce table references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// The text did not parse as SQL.
    #[error("scope parse failed: {0}")]
    Parse(String),

    /// The text parsed to no statements.
    #[error("no statement to extract scope from")]
    Empty,
}

impl From<sqlparser::parser::ParserError> for ScopeError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter, 7, "`");
        assert_eq!(err.to_string(), "unexpected character \"`\" at offset 7");
    }

    #[test]
    fn parse_error_lists_expected_tokens() {
        let err = ParseError::new(
            ParseErrorKind::MismatchedToken,
            10,
            Some("WHERE".to_string()),
            vec![TokenKind::From, TokenKind::Comma],
        );
        assert_eq!(err.to_string(), "expected one of FROM, ,, found 'WHERE'");
    }

    #[test]
    fn parse_error_at_end_of_input() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedEof,
            6,
            None,
            vec![TokenKind::Star],
        );
        assert_eq!(err.to_string(), "expected one of *, found end of input");
    }

    #[test]
    fn parse_error_truncates_long_expected_lists() {
        let err = ParseError::new(
            ParseErrorKind::MismatchedToken,
            0,
            Some("x".to_string()),
            TokenKind::ALL[..12].to_vec(),
        );
        assert!(err.message.ends_with(", ..., found 'x'"));
    }

    #[test]
    fn no_viable_alternative_message() {
        let err = ParseError::new(
            ParseErrorKind::NoViableAlternative,
            0,
            Some("FROM".to_string()),
            Vec::new(),
        );
        assert_eq!(err.to_string(), "no statement can start with 'FROM'");
    }

    #[test]
    fn prediction_error_display() {
        let err = PredictionError::BudgetExceeded { budget: 10 };
        assert_eq!(err.to_string(), "prediction exceeded its budget of 10 steps");
        let err = PredictionError::UnknownRule("nope".to_string());
        assert_eq!(err.to_string(), "unknown grammar rule: nope");
    }

    #[test]
    fn error_trait() {
        let err = ScopeError::Empty;
        let _: &dyn std::error::Error = &err;
    }
}
