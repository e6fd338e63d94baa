//! Which tables a statement references.
//!
//! Column suggestions are drawn from the tables in scope. Two strategies
//! produce them: a full SQL parse ([`AstScopeExtractor`]) and, when that
//! fails on incomplete or QuestDB-specific text, a scan over the recognizer's
//! tokens ([`scan_tokens`]).

mod ast_extractor;
mod token_scan;

pub use ast_extractor::AstScopeExtractor;
pub use token_scan::scan_tokens;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ScopeError;

/// A table referenced in the query, with the alias it goes by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableRef {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: Some(alias.into()),
        }
    }

    /// Whether `name` is this reference's alias or, lacking one, its table.
    pub fn is_named(&self, name: &str) -> bool {
        self.alias
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(name))
            || self.table.eq_ignore_ascii_case(name)
    }
}

/// Tables and CTE names found in a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScopeExtraction {
    pub tables: Vec<TableRef>,
    pub cte_names: Vec<String>,
}

impl ScopeExtraction {
    /// Adds `table` unless an identical reference is already present.
    pub fn push_table(&mut self, table: TableRef) {
        if !self.tables.contains(&table) {
            self.tables.push(table);
        }
    }

    pub fn push_cte(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.cte_names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            self.cte_names.push(name);
        }
    }
}

/// Resolves the tables referenced by a SQL text.
///
/// Implementations must be pure: the same text always yields the same result.
pub trait ScopeExtractor: Send + Sync {
    fn extract(&self, sql: &str) -> Result<ScopeExtraction, ScopeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ref_naming() {
        let aliased = TableRef::aliased("trades", "t");
        assert!(aliased.is_named("T"));
        assert!(aliased.is_named("trades"));
        assert!(!aliased.is_named("x"));
    }

    #[test]
    fn test_push_deduplicates() {
        let mut scope = ScopeExtraction::default();
        scope.push_table(TableRef::new("a"));
        scope.push_table(TableRef::new("a"));
        scope.push_table(TableRef::aliased("a", "x"));
        scope.push_cte("c");
        scope.push_cte("C");
        assert_eq!(scope.tables.len(), 2);
        assert_eq!(scope.cte_names, vec!["c".to_string()]);
    }
}
