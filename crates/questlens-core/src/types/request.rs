//! Request types for the completion API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Schema;
use crate::recognizer::DEFAULT_STEP_BUDGET;

/// A request for suggestions at a cursor position.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// The SQL text (UTF-8, multi-statement supported)
    pub sql: String,

    /// Byte offset of the cursor in `sql`
    pub cursor_offset: usize,

    /// Tables and columns to suggest from
    #[serde(default)]
    pub schema: Schema,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<AssistOptions>,
}

/// Knobs for the content-assist pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistOptions {
    /// Prefixes with more tokens than this skip exhaustive prediction and
    /// fall back to a generic identifier prediction.
    pub max_prediction_tokens: usize,

    /// Step budget for one prediction run.
    pub max_prediction_steps: usize,

    /// Resolve tables in scope with the full SQL parser before falling back
    /// to the token scan.
    pub use_scope_extractor: bool,
}

impl Default for AssistOptions {
    fn default() -> Self {
        Self {
            max_prediction_tokens: 150,
            max_prediction_steps: DEFAULT_STEP_BUDGET,
            use_scope_extractor: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let json = r#"{ "sql": "SELECT ", "cursorOffset": 7 }"#;
        let request: CompletionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.cursor_offset, 7);
        assert!(request.schema.tables.is_empty());
        assert!(request.options.is_none());
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: AssistOptions =
            serde_json::from_str(r#"{ "maxPredictionTokens": 20 }"#).unwrap();
        assert_eq!(options.max_prediction_tokens, 20);
        assert_eq!(options.max_prediction_steps, DEFAULT_STEP_BUDGET);
        assert!(options.use_scope_extractor);
    }
}
