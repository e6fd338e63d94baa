//! Public data types for the completion API.
//!
//! Everything here is plain data: serde (camelCase JSON) and JSON Schema
//! derives, no behavior beyond construction helpers.

mod common;
mod request;
mod response;
mod schema;

pub use common::Span;
pub use request::{AssistOptions, CompletionRequest};
pub use response::{CompletionResponse, Priority, Suggestion, SuggestionKind};
pub use schema::{ColumnInfo, Schema, TableInfo};
