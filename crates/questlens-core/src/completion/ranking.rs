//! Table ranking by the columns a query already references.

use std::collections::{HashMap, HashSet};

use super::orchestrator::ContentAssistResult;
use crate::lexer::TokenCategory;
use crate::types::{Priority, Schema, Suggestion, SuggestionKind};

/// Lowercase table name to lowercase column names, built once per schema.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    tables: HashMap<String, HashSet<String>>,
    columns: HashSet<String>,
}

impl ColumnIndex {
    pub fn new(schema: &Schema) -> Self {
        let mut tables: HashMap<String, HashSet<String>> = HashMap::new();
        let mut columns = HashSet::new();
        for (table, cols) in &schema.columns {
            let entry = tables.entry(table.to_lowercase()).or_default();
            for col in cols {
                let name = col.name.to_lowercase();
                entry.insert(name.clone());
                columns.insert(name);
            }
        }
        Self { tables, columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names referenced anywhere in the text.
    ///
    /// A name counts when some indexed table has a column of that name and the
    /// name is not a table, alias, CTE or the word being typed.
    pub fn referenced_columns(&self, result: &ContentAssistResult) -> HashSet<String> {
        let mut excluded: HashSet<String> = HashSet::new();
        for table in &result.tables_in_scope {
            excluded.insert(table.table.to_lowercase());
            if let Some(alias) = &table.alias {
                excluded.insert(alias.to_lowercase());
            }
        }
        excluded.extend(result.cte_names.iter().map(|n| n.to_lowercase()));
        excluded.extend(self.tables.keys().cloned());
        if let Some(word) = &result.partial_word {
            excluded.insert(word.to_lowercase());
        }

        result
            .all_tokens
            .iter()
            .filter(|t| t.kind.is_in(TokenCategory::IdentifierLike))
            .map(|t| t.unquoted().to_lowercase())
            .filter(|name| self.columns.contains(name) && !excluded.contains(name))
            .collect()
    }

    /// Raises table suggestions that contain referenced columns: all of them
    /// to [`Priority::High`], some of them to [`Priority::Medium`].
    pub fn boost_tables(&self, suggestions: &mut [Suggestion], referenced: &HashSet<String>) {
        if referenced.is_empty() {
            return;
        }
        for suggestion in suggestions
            .iter_mut()
            .filter(|s| s.kind == SuggestionKind::Table)
        {
            let Some(columns) = self.tables.get(&suggestion.label.to_lowercase()) else {
                continue;
            };
            let hits = referenced.iter().filter(|c| columns.contains(*c)).count();
            let boosted = if hits == referenced.len() {
                Priority::High
            } else if hits > 0 {
                Priority::Medium
            } else {
                continue;
            };
            suggestion.priority = suggestion.priority.min(boosted);
        }
    }
}
