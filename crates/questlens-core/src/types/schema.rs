//! Schema metadata supplied by the caller.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tables and columns known to the editor.
///
/// `columns` is keyed by table name. Keys are compared case-insensitively;
/// [`Schema::normalized`] lowercases them once so lookups are plain map hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    #[serde(default)]
    pub columns: HashMap<String, Vec<ColumnInfo>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub name: String,
    /// Name of the designated timestamp column, if the table has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designated_timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            designated_timestamp: None,
        }
    }

    pub fn with_designated_timestamp(mut self, column: impl Into<String>) -> Self {
        self.designated_timestamp = Some(column.into());
        self
    }
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

impl Schema {
    pub fn new(tables: Vec<TableInfo>) -> Self {
        Self {
            tables,
            columns: HashMap::new(),
        }
    }

    /// Adds columns for `table`, appending to any already known.
    pub fn with_columns(mut self, table: &str, columns: Vec<ColumnInfo>) -> Self {
        self.columns
            .entry(table.to_lowercase())
            .or_default()
            .extend(columns);
        self
    }

    /// Lowercases the column map keys, merging keys that differ only by case.
    pub fn normalized(self) -> Self {
        let mut columns: HashMap<String, Vec<ColumnInfo>> = HashMap::new();
        for (table, cols) in self.columns {
            columns.entry(table.to_lowercase()).or_default().extend(cols);
        }
        Self {
            tables: self.tables,
            columns,
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Columns of `table`, empty when unknown. Expects a normalized schema.
    pub fn columns_of(&self, table: &str) -> &[ColumnInfo] {
        self.columns
            .get(&table.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_deserialization() {
        let json = r#"{
            "tables": [{ "name": "trades", "designatedTimestamp": "ts" }],
            "columns": {
                "Trades": [
                    { "name": "ts", "dataType": "TIMESTAMP" },
                    { "name": "price", "dataType": "DOUBLE" }
                ]
            }
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let schema = schema.normalized();
        assert_eq!(schema.tables[0].designated_timestamp.as_deref(), Some("ts"));
        assert_eq!(schema.columns_of("TRADES").len(), 2);
        assert!(schema.table("TRADES").is_some());
    }

    #[test]
    fn test_normalized_merges_case_variants() {
        let mut schema = Schema::new(vec![TableInfo::new("t")]);
        schema
            .columns
            .insert("T".to_string(), vec![ColumnInfo::new("a", "INT")]);
        schema
            .columns
            .insert("t".to_string(), vec![ColumnInfo::new("b", "INT")]);
        let schema = schema.normalized();
        assert_eq!(schema.columns.len(), 1);
        assert_eq!(schema.columns_of("t").len(), 2);
        assert!(schema.columns_of("missing").is_empty());
    }
}
