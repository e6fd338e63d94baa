//! Schema-aware content assist.
//!
//! [`content_assist`] turns text and a cursor into predicted token kinds and
//! tables in scope; [`CompletionProvider`] ranks them into suggestions.

mod orchestrator;
mod provider;
mod ranking;
mod suggestions;

pub use orchestrator::{content_assist, ContentAssistResult, IdentifierContext};
pub use provider::{complete, CompletionProvider};
pub use ranking::ColumnIndex;
pub use suggestions::{build_suggestions, quote_identifier};
