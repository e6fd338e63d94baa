//! Response types for the completion API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::LexError;
use crate::lexer::TokenKind;
use crate::scope::TableRef;

/// What a suggestion inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionKind {
    Keyword,
    Function,
    Table,
    Column,
    Operator,
    DataType,
}

/// Display rank. Variants are declared best first, so sorting ascending puts
/// the most relevant suggestions at the top.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    High,
    Medium,
    MediumLow,
    Low,
}

/// One editor completion item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub insert_text: String,
    /// Text the editor should match the typed word against, when it differs
    /// from `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Suggestion {
    pub fn new(label: impl Into<String>, kind: SuggestionKind, priority: Priority) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            filter_text: None,
            priority,
            detail: None,
            description: None,
        }
    }

    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = text.into();
        self
    }

    pub fn with_filter_text(mut self, text: impl Into<String>) -> Self {
        self.filter_text = Some(text.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Suggestions plus the intermediate results that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub suggestions: Vec<Suggestion>,
    pub next_token_kinds: Vec<TokenKind>,
    pub tables_in_scope: Vec<TableRef>,
    pub is_mid_word: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_word: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lex_errors: Vec<LexError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::MediumLow);
        assert!(Priority::MediumLow < Priority::Low);
    }

    #[test]
    fn test_suggestion_serialization() {
        let suggestion = Suggestion::new("price", SuggestionKind::Column, Priority::High)
            .with_detail("DOUBLE");
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["insertText"], "price");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["kind"], "column");
        assert!(json.get("filterText").is_none());
    }
}
