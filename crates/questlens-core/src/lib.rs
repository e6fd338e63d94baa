pub mod completion;
pub mod error;
pub mod generated;
pub mod grammar;
pub mod lexer;
pub mod recognizer;
pub mod scope;
pub mod types;

// Re-export main types and functions
pub use completion::{complete, content_assist, CompletionProvider, ContentAssistResult};
pub use error::{LexError, ParseError, PredictionError, ScopeError};
pub use grammar::Rule;
pub use lexer::{tokenize, Token, TokenCategory, TokenKind, Tokenized};
pub use recognizer::{parse, parse_sql, predict_next_tokens, CstNode, Prediction, SqlParse};
pub use scope::{AstScopeExtractor, ScopeExtraction, ScopeExtractor, TableRef};

pub use types::{
    // Request types
    AssistOptions,
    ColumnInfo,
    CompletionRequest,
    // Response types
    CompletionResponse,
    Priority,
    Schema,
    Span,
    Suggestion,
    SuggestionKind,
    TableInfo,
};
