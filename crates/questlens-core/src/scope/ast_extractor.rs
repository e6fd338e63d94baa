//! Scope extraction from a full sqlparser AST.

#[cfg(feature = "tracing")]
use tracing::trace;

use sqlparser::ast::{ObjectName, ObjectNamePart, Query, TableFactor, Visit, Visitor};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::ops::ControlFlow;

use super::{ScopeExtraction, ScopeExtractor, TableRef};
use crate::error::ScopeError;

/// Parses the text with sqlparser's generic dialect and collects every table
/// factor and CTE name.
///
/// QuestDB extensions (`SAMPLE BY`, `LATEST ON`, bare-table queries) do not
/// parse here; callers fall back to [`scan_tokens`](super::scan_tokens).
#[derive(Debug, Clone, Copy, Default)]
pub struct AstScopeExtractor;

impl ScopeExtractor for AstScopeExtractor {
    fn extract(&self, sql: &str) -> Result<ScopeExtraction, ScopeError> {
        let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
        if statements.is_empty() {
            return Err(ScopeError::Empty);
        }
        let mut collector = ScopeCollector::default();
        let _ = statements.visit(&mut collector);
        #[cfg(feature = "tracing")]
        trace!(tables = collector.scope.tables.len(), "scope from AST");
        Ok(collector.scope)
    }
}

/// Extract the identifier value from an ObjectName part.
fn object_name_part_value(part: &ObjectNamePart) -> String {
    part.as_ident()
        .map(|ident| ident.value.clone())
        .unwrap_or_else(|| part.to_string())
}

/// The last segment of a possibly qualified name.
fn simple_name(name: &ObjectName) -> String {
    name.0.last().map(object_name_part_value).unwrap_or_default()
}

#[derive(Default)]
struct ScopeCollector {
    scope: ScopeExtraction,
    /// A table factor was just recorded; its relation name is visited next.
    factor_pending: bool,
}

impl Visitor for ScopeCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<()> {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.scope.push_cte(cte.alias.name.value.clone());
            }
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<()> {
        if let TableFactor::Table { name, alias, .. } = factor {
            let table = simple_name(name);
            self.scope.push_table(match alias {
                Some(alias) => TableRef::aliased(table, alias.name.value.clone()),
                None => TableRef::new(table),
            });
            self.factor_pending = true;
        }
        ControlFlow::Continue(())
    }

    // Relations outside table factors, e.g. INSERT targets.
    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<()> {
        if std::mem::take(&mut self.factor_pending) {
            return ControlFlow::Continue(());
        }
        self.scope.push_table(TableRef::new(simple_name(relation)));
        ControlFlow::Continue(())
    }
}
