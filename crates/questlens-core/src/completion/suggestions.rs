//! From predicted token kinds and scope to ranked suggestions.

use std::collections::{HashMap, HashSet};

use super::orchestrator::ContentAssistResult;
use super::ranking::ColumnIndex;
use crate::generated::{FunctionInfo, DATA_TYPES, FUNCTIONS};
use crate::lexer::{TokenClass, TokenKind};
use crate::scope::TableRef;
use crate::types::{ColumnInfo, Priority, Schema, Suggestion, SuggestionKind};

/// Keywords after which a table name is expected.
const TABLE_KEYWORDS: &[TokenKind] = &[
    TokenKind::From,
    TokenKind::Join,
    TokenKind::Update,
    TokenKind::Into,
    TokenKind::Table,
];

/// Builds the suggestion list for one content-assist result.
pub fn build_suggestions(
    result: &ContentAssistResult,
    schema: &Schema,
    index: &ColumnIndex,
) -> Vec<Suggestion> {
    let mut builder = Builder::default();

    if result.next_token_kinds.is_empty() {
        if follows_table_keyword(result) {
            builder.push_tables(schema, &result.cte_names);
        }
        return builder.finish(result, index);
    }

    for kind in &result.next_token_kinds {
        if kind.is_keyword() {
            builder.push(Suggestion::new(
                kind.text(),
                SuggestionKind::Keyword,
                Priority::Medium,
            ));
        }
    }

    let context = result.identifier_context;
    if let Some(table) = qualified_table(result, schema) {
        builder.push_columns(&[Source::bare(&table, schema.columns_of(&table))]);
    } else {
        let mut names_offered = false;
        if context.wants_columns() {
            let sources = column_sources(&result.tables_in_scope, schema);
            builder.push_columns(&sources);
            names_offered = true;
        }
        if context.wants_tables() {
            builder.push_tables(schema, &result.cte_names);
            names_offered = true;
        }
        if result.is_mid_word && names_offered {
            for function in FUNCTIONS {
                builder.push(function_suggestion(function));
            }
        }
    }

    if context.data_type {
        for data_type in DATA_TYPES {
            let mut suggestion =
                Suggestion::new(data_type.name, SuggestionKind::DataType, Priority::Medium);
            if let Some(description) = data_type.description {
                suggestion = suggestion.with_description(description);
            }
            builder.push(suggestion);
        }
    }

    if builder.suggestions.is_empty() {
        for kind in &result.next_token_kinds {
            if kind.class() == TokenClass::Punctuation {
                builder.push(Suggestion::new(
                    kind.text(),
                    SuggestionKind::Operator,
                    Priority::Medium,
                ));
            }
        }
    }

    builder.finish(result, index)
}

/// Signature in `detail`, category and summary in `description`.
fn function_suggestion(function: &FunctionInfo) -> Suggestion {
    let category = function.category.as_str();
    let description = match function.description {
        Some(text) => format!("{category} function: {text}"),
        None => format!("{category} function"),
    };
    Suggestion::new(function.name, SuggestionKind::Function, Priority::Low)
        .with_detail(function.signature)
        .with_description(description)
}

#[derive(Default)]
struct Builder {
    suggestions: Vec<Suggestion>,
    seen: HashSet<(SuggestionKind, String)>,
}

impl Builder {
    fn push(&mut self, suggestion: Suggestion) {
        if self
            .seen
            .insert((suggestion.kind, suggestion.label.clone()))
        {
            self.suggestions.push(suggestion);
        }
    }

    fn push_tables(&mut self, schema: &Schema, cte_names: &[String]) {
        for table in &schema.tables {
            let mut suggestion =
                Suggestion::new(&table.name, SuggestionKind::Table, Priority::MediumLow)
                    .with_insert_text(quote_identifier(&table.name));
            if let Some(ts) = &table.designated_timestamp {
                suggestion = suggestion.with_detail(ts);
            }
            self.push(suggestion);
        }
        for cte in cte_names {
            self.push(
                Suggestion::new(cte, SuggestionKind::Table, Priority::MediumLow)
                    .with_insert_text(quote_identifier(cte))
                    .with_detail("CTE"),
            );
        }
    }

    /// One bare suggestion per column name, or one `alias.column` per source
    /// when two or more aliased sources share the name.
    fn push_columns(&mut self, sources: &[Source<'_>]) {
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<(&Source<'_>, &ColumnInfo)>> = HashMap::new();
        for source in sources {
            for column in source.columns {
                let key = column.name.to_lowercase();
                let group = groups.entry(key.clone()).or_default();
                if group.is_empty() {
                    order.push(key);
                }
                group.push((source, column));
            }
        }

        for key in &order {
            let group = &groups[key];
            let aliased = group.iter().filter(|(s, _)| s.alias.is_some()).count();
            for (i, (source, column)) in group.iter().enumerate() {
                match source.alias {
                    Some(alias) if aliased >= 2 => self.push(
                        Suggestion::new(
                            format!("{alias}.{}", column.name),
                            SuggestionKind::Column,
                            Priority::High,
                        )
                        .with_insert_text(format!(
                            "{}.{}",
                            quote_identifier(alias),
                            quote_identifier(&column.name)
                        ))
                        .with_filter_text(&column.name)
                        .with_detail(&column.data_type)
                        .with_description(source.table),
                    ),
                    _ if i == 0 || aliased >= 2 => self.push(column_suggestion(source, column)),
                    _ => {}
                }
            }
        }
    }

    fn finish(mut self, result: &ContentAssistResult, index: &ColumnIndex) -> Vec<Suggestion> {
        if !index.is_empty() {
            let referenced = index.referenced_columns(result);
            index.boost_tables(&mut self.suggestions, &referenced);
        }
        self.suggestions.sort_by_key(|s| s.priority);
        self.suggestions
    }
}

/// A table contributing columns, with the alias it is referenced by.
struct Source<'a> {
    table: &'a str,
    alias: Option<&'a str>,
    columns: &'a [ColumnInfo],
}

impl<'a> Source<'a> {
    fn bare(table: &'a str, columns: &'a [ColumnInfo]) -> Self {
        Self {
            table,
            alias: None,
            columns,
        }
    }
}

fn column_suggestion(source: &Source<'_>, column: &ColumnInfo) -> Suggestion {
    Suggestion::new(&column.name, SuggestionKind::Column, Priority::High)
        .with_insert_text(quote_identifier(&column.name))
        .with_detail(&column.data_type)
        .with_description(source.table)
}

/// Tables in scope that have known columns, or every schema table if none do.
fn column_sources<'a>(scope: &'a [TableRef], schema: &'a Schema) -> Vec<Source<'a>> {
    let in_scope: Vec<Source<'a>> = scope
        .iter()
        .filter_map(|r| {
            let columns = schema.columns_of(&r.table);
            (!columns.is_empty()).then(|| Source {
                table: r.table.as_str(),
                alias: r.alias.as_deref(),
                columns,
            })
        })
        .collect();
    if !in_scope.is_empty() {
        return in_scope;
    }

    let mut sources: Vec<Source<'a>> = schema
        .tables
        .iter()
        .map(|t| Source::bare(&t.name, schema.columns_of(&t.name)))
        .collect();
    let mut unlisted: Vec<&String> = schema
        .columns
        .keys()
        .filter(|k| schema.table(k).is_none())
        .collect();
    unlisted.sort();
    sources.extend(
        unlisted
            .into_iter()
            .map(|k| Source::bare(k, schema.columns_of(k))),
    );
    sources
}

/// The table a trailing `qualifier.` refers to, when it resolves to a table
/// or alias in scope, or to a schema table.
fn qualified_table(result: &ContentAssistResult, schema: &Schema) -> Option<String> {
    let qualifier = result.qualifier.as_deref()?;
    let by_alias = result
        .tables_in_scope
        .iter()
        .find(|r| r.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(qualifier)));
    if let Some(table) = by_alias {
        return Some(table.table.clone());
    }
    if let Some(table) = result.tables_in_scope.iter().find(|r| r.is_named(qualifier)) {
        return Some(table.table.clone());
    }
    schema.table(qualifier).map(|t| t.name.clone())
}

fn follows_table_keyword(result: &ContentAssistResult) -> bool {
    result
        .tokens_before_cursor
        .iter()
        .rev()
        .find(|t| !t.kind.is_internal())
        .is_some_and(|t| TABLE_KEYWORDS.contains(&t.kind))
}

/// Double-quotes `name` unless it is a plain identifier and not reserved.
pub fn quote_identifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    let reserved = TokenKind::keyword(name).is_some_and(TokenKind::is_reserved);
    if plain && !reserved {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::content_assist;
    use crate::scope::AstScopeExtractor;
    use crate::types::{AssistOptions, TableInfo};

    fn schema() -> Schema {
        Schema::new(vec![
            TableInfo::new("trades").with_designated_timestamp("ts"),
            TableInfo::new("orders"),
        ])
        .with_columns(
            "trades",
            vec![
                ColumnInfo::new("symbol", "SYMBOL"),
                ColumnInfo::new("price", "DOUBLE"),
                ColumnInfo::new("ts", "TIMESTAMP"),
            ],
        )
        .with_columns(
            "orders",
            vec![
                ColumnInfo::new("id", "LONG"),
                ColumnInfo::new("status", "SYMBOL"),
            ],
        )
    }

    fn suggest(sql: &str, cursor: usize) -> Vec<Suggestion> {
        let schema = schema();
        let index = ColumnIndex::new(&schema);
        let result = content_assist(
            sql,
            cursor,
            Some(&AstScopeExtractor),
            &AssistOptions::default(),
        );
        build_suggestions(&result, &schema, &index)
    }

    fn labels(suggestions: &[Suggestion], kind: SuggestionKind) -> Vec<&str> {
        suggestions
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.label.as_str())
            .collect()
    }

    #[test]
    fn test_columns_of_tables_in_scope() {
        let suggestions = suggest("SELECT  FROM trades", 7);
        let columns = labels(&suggestions, SuggestionKind::Column);
        assert_eq!(columns, vec!["symbol", "price", "ts"]);
        let ts = suggestions.iter().find(|s| s.label == "ts").unwrap();
        assert_eq!(ts.detail.as_deref(), Some("TIMESTAMP"));
        assert_eq!(ts.description.as_deref(), Some("trades"));
        let trades = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Table && s.label == "trades")
            .unwrap();
        assert_eq!(trades.detail.as_deref(), Some("ts"));
    }

    #[test]
    fn test_columns_rank_above_tables_and_functions() {
        let suggestions = suggest("SELECT pr FROM trades", 9);
        let first_table = suggestions
            .iter()
            .position(|s| s.kind == SuggestionKind::Table)
            .unwrap();
        let first_function = suggestions
            .iter()
            .position(|s| s.kind == SuggestionKind::Function)
            .unwrap();
        let last_column = suggestions
            .iter()
            .rposition(|s| s.kind == SuggestionKind::Column)
            .unwrap();
        assert!(last_column < first_table);
        assert!(first_table < first_function);
    }

    #[test]
    fn test_no_functions_without_typed_prefix() {
        let suggestions = suggest("SELECT  FROM trades", 7);
        assert!(labels(&suggestions, SuggestionKind::Function).is_empty());
    }

    #[test]
    fn test_function_suggestions_carry_category() {
        let suggestions = suggest("SELECT av FROM trades", 9);
        let avg = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Function && s.label == "avg")
            .unwrap();
        assert_eq!(avg.detail.as_deref(), Some("avg(value)"));
        assert_eq!(
            avg.description.as_deref(),
            Some("aggregate function: Arithmetic mean of the values in the group")
        );
    }

    #[test]
    fn test_unknown_scope_falls_back_to_all_columns() {
        let suggestions = suggest("SELECT  FROM read_parquet('x.parquet')", 7);
        let columns = labels(&suggestions, SuggestionKind::Column);
        assert!(columns.contains(&"symbol"));
        assert!(columns.contains(&"status"));
    }

    #[test]
    fn test_self_join_gets_alias_qualified_columns() {
        let sql = "SELECT  FROM trades t1 JOIN trades t2 ON t1.ts=t2.ts";
        let suggestions = suggest(sql, 7);
        let columns = labels(&suggestions, SuggestionKind::Column);
        assert!(columns.contains(&"t1.symbol"));
        assert!(columns.contains(&"t2.symbol"));
        assert!(!columns.contains(&"symbol"));
        let qualified = suggestions.iter().find(|s| s.label == "t1.price").unwrap();
        assert_eq!(qualified.filter_text.as_deref(), Some("price"));
    }

    #[test]
    fn test_qualifier_restricts_columns() {
        let suggestions = suggest("SELECT o. FROM trades t JOIN orders o ON t.ts = o.id", 9);
        assert_eq!(labels(&suggestions, SuggestionKind::Column), vec!["id", "status"]);
        assert!(labels(&suggestions, SuggestionKind::Table).is_empty());
    }

    #[test]
    fn test_implicit_table_from_qualifier() {
        let suggestions = suggest("SELECT trades.", 14);
        assert_eq!(
            labels(&suggestions, SuggestionKind::Column),
            vec!["symbol", "price", "ts"]
        );
    }

    #[test]
    fn test_internal_tokens_are_not_keywords() {
        let sql = "SELECT * FROM trades WHERE price ";
        let suggestions = suggest(sql, sql.len());
        let keywords = labels(&suggestions, SuggestionKind::Keyword);
        for expected in ["BETWEEN", "IN", "LIKE", "ILIKE", "IS"] {
            assert!(keywords.contains(&expected), "missing {expected}");
        }
        for symbol in ["&", "|", "^", "="] {
            assert!(!keywords.contains(&symbol));
        }
    }

    #[test]
    fn test_table_position_offers_tables_and_ctes() {
        let sql = "WITH recent AS (SELECT * FROM trades) SELECT * FROM ";
        let suggestions = suggest(sql, sql.len());
        let tables = labels(&suggestions, SuggestionKind::Table);
        assert!(tables.contains(&"trades"));
        assert!(tables.contains(&"recent"));
        assert!(labels(&suggestions, SuggestionKind::Column).is_empty());
    }

    #[test]
    fn test_fallback_after_table_keyword() {
        let sql = "SELECT FROM ";
        let suggestions = suggest(sql, sql.len());
        assert_eq!(
            labels(&suggestions, SuggestionKind::Table),
            vec!["trades", "orders"]
        );
    }

    #[test]
    fn test_boost_follows_referenced_columns() {
        let sql = "SELECT status FROM ";
        let suggestions = suggest(sql, sql.len());
        let orders = suggestions.iter().find(|s| s.label == "orders").unwrap();
        let trades = suggestions.iter().find(|s| s.label == "trades").unwrap();
        assert_eq!(orders.priority, Priority::High);
        assert_eq!(trades.priority, Priority::MediumLow);
        assert_eq!(suggestions[0].label, "orders");
    }

    #[test]
    fn test_data_type_position() {
        let sql = "CREATE TABLE t (a ";
        let suggestions = suggest(sql, sql.len());
        let types = labels(&suggestions, SuggestionKind::DataType);
        assert!(types.contains(&"symbol"));
        assert!(types.contains(&"timestamp"));
    }

    #[test]
    fn test_punctuation_when_nothing_else() {
        let sql = "SELECT * FROM trades SAMPLE BY 1h FILL ";
        let suggestions = suggest(sql, sql.len());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Operator);
        assert_eq!(suggestions[0].label, "(");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("price"), "price");
        assert_eq!(quote_identifier("my col"), "\"my col\"");
        assert_eq!(quote_identifier("1st"), "\"1st\"");
        assert_eq!(quote_identifier("select"), "\"select\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
