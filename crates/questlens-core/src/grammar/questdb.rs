//! QuestDB rule set.
//!
//! Identifiers are only consumed inside the naming rules ([`Rule::TableName`],
//! [`Rule::ColumnReference`], [`Rule::FunctionName`], [`Rule::DataType`],
//! [`Rule::QualifiedStar`], [`Rule::Name`]) so a prediction's rule stack tells
//! which kind of name is expected.

use super::Rule as R;
use super::{alt, ident, list, many, opt, seq, Expr, Rule};
use crate::lexer::TokenKind as K;

fn many1(e: impl Into<Expr>) -> Expr {
    let e = e.into();
    seq![e.clone(), many(e)]
}

fn if_not_exists() -> Expr {
    opt(seq![K::If, K::Not, K::Exists])
}

fn if_exists() -> Expr {
    opt(seq![K::If, K::Exists])
}

fn parenthesized(e: impl Into<Expr>) -> Expr {
    seq![K::LParen, e.into(), K::RParen]
}

fn partition_list() -> Expr {
    seq![K::List, list(K::StringLiteral, K::Comma)]
}

pub(super) fn define(rule: Rule) -> Expr {
    match rule {
        R::Statements => seq![
            opt(R::Statement),
            many(seq![K::Semicolon, opt(R::Statement)])
        ],
        // Catch-all forms starting with a bare table name come last.
        R::Statement => alt![
            R::SelectStatement,
            R::InsertStatement,
            R::UpdateStatement,
            R::CreateTableStatement,
            R::AlterTableStatement,
            R::DropTableStatement,
            R::TruncateTableStatement,
            R::RenameTableStatement,
            R::ShowStatement,
            R::ExplainStatement,
            R::CopyStatement,
            R::DeclareStatement,
            R::VacuumTableStatement,
            R::ReindexTableStatement,
            R::PivotStatement,
            R::ImplicitSelect,
        ],

        // ---- SELECT ----
        R::SelectStatement => seq![opt(R::WithClause), R::QueryExpression],
        R::WithClause => seq![K::With, list(R::CommonTableExpression, K::Comma)],
        R::CommonTableExpression => {
            seq![R::Name, K::As, parenthesized(R::SelectStatement)]
        }
        R::QueryExpression => seq![
            R::QueryPrimary,
            many(seq![R::SetOperator, R::QueryPrimary])
        ],
        R::SetOperator => alt![
            seq![K::Union, opt(K::All)],
            seq![K::Except, opt(K::All)],
            seq![K::Intersect, opt(K::All)],
        ],
        R::QueryPrimary => alt![R::SimpleSelect, parenthesized(R::QueryExpression)],
        R::SimpleSelect => seq![
            K::Select,
            opt(K::Distinct),
            R::SelectList,
            opt(R::FromClause),
            opt(R::WhereClause),
            opt(R::LatestOnClause),
            opt(R::SampleByClause),
            opt(R::GroupByClause),
            opt(R::HavingClause),
            opt(R::OrderByClause),
            opt(R::LimitClause),
        ],
        R::SelectList => list(R::SelectItem, K::Comma),
        R::SelectItem => alt![
            K::Star,
            R::QualifiedStar,
            seq![R::Expression, opt(R::Alias)]
        ],
        R::QualifiedStar => seq![ident(), many(seq![K::Dot, ident()]), K::Dot, K::Star],
        R::Alias => alt![seq![K::As, R::Name], R::Name],
        R::FromClause => seq![K::From, list(R::TableReference, K::Comma)],
        R::TableReference => seq![R::TablePrimary, many(R::JoinClause)],
        R::TablePrimary => seq![
            alt![
                parenthesized(R::SelectStatement),
                R::FunctionCall,
                R::TableName
            ],
            opt(R::TimestampDesignation),
            opt(R::Alias),
        ],
        R::TimestampDesignation => seq![K::Timestamp, parenthesized(R::ColumnReference)],
        R::JoinClause => seq![
            opt(R::JoinType),
            K::Join,
            R::TablePrimary,
            opt(seq![K::On, R::Expression])
        ],
        R::JoinType => alt![
            K::Inner,
            seq![K::Left, opt(K::Outer)],
            seq![K::Right, opt(K::Outer)],
            seq![K::Full, opt(K::Outer)],
            K::Cross,
            K::Asof,
            K::Lt,
            K::Splice,
        ],
        R::WhereClause => seq![K::Where, R::Expression],
        R::LatestOnClause => seq![
            K::Latest,
            alt![
                seq![
                    K::On,
                    R::ColumnReference,
                    K::Partition,
                    K::By,
                    list(R::ColumnReference, K::Comma)
                ],
                seq![K::By, list(R::ColumnReference, K::Comma)],
            ]
        ],
        R::SampleByClause => seq![
            K::Sample,
            K::By,
            alt![K::DurationLiteral, K::Variable],
            opt(seq![K::From, R::Expression, K::To, R::Expression]),
            opt(R::FillClause),
            opt(R::AlignToClause),
        ],
        R::FillClause => seq![K::Fill, parenthesized(list(R::FillValue, K::Comma))],
        R::FillValue => alt![K::None, K::Null, K::Prev, K::Linear, R::Expression],
        R::AlignToClause => seq![
            K::Align,
            K::To,
            alt![
                seq![
                    K::Calendar,
                    opt(seq![K::Time, K::Zone, R::Expression]),
                    opt(seq![K::With, K::Offset, R::Expression]),
                ],
                seq![K::First, K::Observation],
            ]
        ],
        R::GroupByClause => seq![K::Group, K::By, R::ExpressionList],
        R::HavingClause => seq![K::Having, R::Expression],
        R::OrderByClause => seq![K::Order, K::By, list(R::OrderItem, K::Comma)],
        R::OrderItem => seq![
            R::Expression,
            opt(alt![K::Asc, K::Desc]),
            opt(seq![K::Nulls, alt![K::First, K::Last]])
        ],
        R::LimitClause => seq![K::Limit, R::Expression, opt(seq![K::Comma, R::Expression])],

        // ---- DML ----
        R::InsertStatement => seq![
            opt(R::WithClause),
            K::Insert,
            opt(alt![K::Atomic, seq![K::Batch, K::NumberLiteral]]),
            K::Into,
            R::TableName,
            opt(R::ColumnList),
            alt![R::ValuesClause, R::SelectStatement],
        ],
        R::ColumnList => parenthesized(list(R::ColumnReference, K::Comma)),
        R::ValuesClause => seq![
            K::Values,
            list(parenthesized(R::ExpressionList), K::Comma)
        ],
        R::UpdateStatement => seq![
            opt(R::WithClause),
            K::Update,
            R::TableName,
            opt(R::Alias),
            K::Set,
            list(R::Assignment, K::Comma),
            opt(seq![K::From, list(R::TableReference, K::Comma)]),
            opt(R::WhereClause),
        ],
        R::Assignment => seq![R::ColumnReference, K::Eq, R::Expression],

        // ---- DDL ----
        R::CreateTableStatement => seq![
            K::Create,
            K::Table,
            if_not_exists(),
            R::Name,
            alt![
                seq![K::As, parenthesized(R::SelectStatement)],
                parenthesized(seq![K::Like, R::TableName]),
                parenthesized(list(R::TableElement, K::Comma)),
            ],
            opt(R::TimestampDesignation),
            opt(R::PartitionByClause),
            opt(R::WalClause),
            opt(R::TtlClause),
            opt(R::DedupClause),
        ],
        R::TableElement => alt![
            seq![
                K::Index,
                K::LParen,
                R::ColumnReference,
                opt(seq![K::Capacity, K::NumberLiteral]),
                K::RParen
            ],
            R::ColumnDefinition,
        ],
        R::ColumnDefinition => seq![
            R::Name,
            R::DataType,
            opt(seq![K::Capacity, K::NumberLiteral]),
            opt(alt![K::Cache, K::Nocache]),
            opt(seq![K::Index, opt(seq![K::Capacity, K::NumberLiteral])]),
        ],
        R::PartitionByClause => seq![K::Partition, K::By, R::PartitionUnit],
        R::PartitionUnit => alt![K::None, K::Hour, K::Day, K::Week, K::Month, K::Year],
        R::WalClause => alt![seq![K::Bypass, K::Wal], K::Wal],
        R::TtlClause => seq![
            K::Ttl,
            alt![
                seq![
                    K::NumberLiteral,
                    alt![
                        K::Hour, K::Hours, K::Day, K::Days, K::Week, K::Weeks, K::Month,
                        K::Months, K::Year, K::Years
                    ]
                ],
                K::DurationLiteral,
            ]
        ],
        R::DedupClause => seq![
            K::Dedup,
            K::Upsert,
            K::Keys,
            parenthesized(list(R::ColumnReference, K::Comma))
        ],
        R::AlterTableStatement => seq![K::Alter, K::Table, R::TableName, R::AlterTableAction],
        R::AlterTableAction => alt![
            seq![
                K::Add,
                K::Column,
                if_not_exists(),
                list(R::ColumnDefinition, K::Comma)
            ],
            seq![K::Drop, K::Column, list(R::ColumnReference, K::Comma)],
            seq![K::Drop, K::Partition, alt![partition_list(), R::WhereClause]],
            seq![K::Rename, K::Column, R::ColumnReference, K::To, R::Name],
            seq![K::Alter, K::Column, R::ColumnReference, R::AlterColumnAction],
            seq![K::Attach, K::Partition, partition_list()],
            seq![K::Detach, K::Partition, alt![partition_list(), R::WhereClause]],
            seq![K::Set, K::Type, opt(K::Bypass), K::Wal],
            seq![
                K::Dedup,
                alt![
                    K::Disable,
                    seq![
                        K::Enable,
                        K::Upsert,
                        K::Keys,
                        parenthesized(list(R::ColumnReference, K::Comma))
                    ]
                ]
            ],
            seq![K::Resume, K::Wal],
        ],
        R::AlterColumnAction => alt![
            seq![K::Add, K::Index],
            seq![K::Drop, K::Index],
            seq![K::Symbol, K::Capacity, K::NumberLiteral],
            K::Cache,
            K::Nocache,
            seq![K::Type, R::DataType],
        ],
        R::DropTableStatement => seq![
            K::Drop,
            alt![
                seq![K::Table, if_exists(), list(R::TableName, K::Comma)],
                seq![K::All, K::Tables],
            ]
        ],
        R::TruncateTableStatement => seq![
            K::Truncate,
            K::Table,
            if_exists(),
            list(R::TableName, K::Comma)
        ],
        R::RenameTableStatement => seq![K::Rename, K::Table, R::TableName, K::To, R::Name],

        // ---- utility ----
        R::ShowStatement => seq![
            K::Show,
            alt![
                K::Tables,
                seq![K::Columns, K::From, R::TableName],
                seq![K::Partitions, K::From, R::TableName],
                seq![K::Create, K::Table, R::TableName],
                K::Parameters,
                seq![K::Time, K::Zone],
            ]
        ],
        R::ExplainStatement => seq![K::Explain, R::Statement],
        R::CopyStatement => seq![
            K::Copy,
            alt![
                seq![K::StringLiteral, K::Cancel],
                seq![
                    R::TableName,
                    K::From,
                    K::StringLiteral,
                    opt(seq![K::With, many1(R::CopyOption)])
                ],
            ]
        ],
        R::CopyOption => alt![
            seq![K::Header, alt![K::True, K::False]],
            seq![K::Timestamp, K::StringLiteral],
            seq![K::Format, K::StringLiteral],
            seq![K::Delimiter, K::StringLiteral],
            seq![K::Partition, K::By, R::PartitionUnit],
            seq![K::On, K::Error, alt![K::SkipRow, K::SkipColumn, K::Abort]],
        ],
        R::DeclareStatement => seq![
            K::Declare,
            list(seq![K::Variable, K::ColonEq, R::Expression], K::Comma),
            R::SelectStatement
        ],
        R::VacuumTableStatement => seq![K::Vacuum, K::Table, R::TableName],
        R::ReindexTableStatement => seq![
            K::Reindex,
            K::Table,
            R::TableName,
            opt(seq![K::Column, R::ColumnReference]),
            opt(seq![K::Partition, K::StringLiteral])
        ],
        R::PivotStatement => seq![
            R::TableName,
            K::Pivot,
            K::LParen,
            list(R::PivotAggregation, K::Comma),
            K::For,
            R::ColumnReference,
            K::In,
            parenthesized(R::ExpressionList),
            opt(R::GroupByClause),
            K::RParen,
            opt(R::OrderByClause),
            opt(R::LimitClause),
        ],
        // A bare alias would swallow the FOR that follows.
        R::PivotAggregation => seq![R::Expression, opt(seq![K::As, R::Name])],
        R::ImplicitSelect => seq![
            R::TableName,
            opt(R::TimestampDesignation),
            opt(R::WhereClause),
            opt(R::LatestOnClause),
            opt(R::SampleByClause),
            opt(R::OrderByClause),
            opt(R::LimitClause),
        ],

        // ---- expressions, loosest binding first ----
        R::Expression => R::OrExpression.into(),
        R::OrExpression => seq![R::AndExpression, many(seq![K::Or, R::AndExpression])],
        R::AndExpression => seq![R::NotExpression, many(seq![K::And, R::NotExpression])],
        R::NotExpression => alt![seq![K::Not, R::NotExpression], R::ComparisonExpression],
        R::ComparisonExpression => seq![R::BitOrExpression, many(R::ComparisonTail)],
        // Operands stop above AND so BETWEEN keeps its own AND.
        R::ComparisonTail => alt![
            seq![R::ComparisonOperator, R::BitOrExpression],
            seq![K::Is, opt(K::Not), K::Null],
            seq![
                opt(K::Not),
                K::Between,
                R::BitOrExpression,
                K::And,
                R::BitOrExpression
            ],
            seq![
                opt(K::Not),
                K::In,
                alt![
                    parenthesized(alt![R::SelectStatement, R::ExpressionList]),
                    K::StringLiteral,
                    K::Variable,
                ]
            ],
            seq![opt(K::Not), alt![K::Like, K::Ilike], R::BitOrExpression],
            seq![alt![K::Tilde, K::NotTilde], R::BitOrExpression],
        ],
        R::ComparisonOperator => alt![
            K::Eq,
            K::NotEq,
            K::LtGt,
            K::Less,
            K::LessEq,
            K::Greater,
            K::GreaterEq,
            K::ShiftLeftEq,
            K::ShiftRightEq,
        ],
        R::BitOrExpression => seq![
            R::BitXorExpression,
            many(seq![K::BitOr, R::BitXorExpression])
        ],
        R::BitXorExpression => seq![
            R::BitAndExpression,
            many(seq![K::BitXor, R::BitAndExpression])
        ],
        R::BitAndExpression => seq![
            R::ShiftExpression,
            many(seq![K::BitAnd, R::ShiftExpression])
        ],
        R::ShiftExpression => seq![
            R::AdditiveExpression,
            many(seq![alt![K::ShiftLeft, K::ShiftRight], R::AdditiveExpression])
        ],
        R::AdditiveExpression => seq![
            R::MultiplicativeExpression,
            many(seq![
                alt![K::Plus, K::Minus, K::Concat],
                R::MultiplicativeExpression
            ])
        ],
        R::MultiplicativeExpression => seq![
            R::UnaryExpression,
            many(seq![alt![K::Star, K::Slash, K::Percent], R::UnaryExpression])
        ],
        R::UnaryExpression => alt![
            seq![alt![K::Minus, K::Plus, K::Tilde], R::UnaryExpression],
            R::PostfixExpression,
        ],
        R::PostfixExpression => seq![
            R::PrimaryExpression,
            many(alt![
                seq![K::DoubleColon, R::DataType],
                seq![K::LBracket, R::ExpressionList, K::RBracket],
            ])
        ],
        R::PrimaryExpression => alt![
            R::Literal,
            R::CastExpression,
            R::CaseExpression,
            R::ExistsExpression,
            parenthesized(alt![R::SelectStatement, R::ExpressionList]),
            R::FunctionCall,
            R::ColumnReference,
            K::Variable,
        ],
        R::Literal => alt![
            K::StringLiteral,
            K::NumberLiteral,
            K::DecimalLiteral,
            K::LongLiteral,
            K::DurationLiteral,
            K::GeohashLiteral,
            K::True,
            K::False,
            K::Null,
        ],
        R::CastExpression => seq![
            K::Cast,
            parenthesized(seq![R::Expression, K::As, R::DataType])
        ],
        R::CaseExpression => seq![
            K::Case,
            opt(R::Expression),
            many1(seq![K::When, R::Expression, K::Then, R::Expression]),
            opt(seq![K::Else, R::Expression]),
            K::End,
        ],
        R::ExistsExpression => seq![K::Exists, parenthesized(R::SelectStatement)],
        R::FunctionCall => seq![
            R::FunctionName,
            K::LParen,
            opt(alt![K::Star, seq![opt(K::Distinct), R::ExpressionList]]),
            K::RParen,
            opt(seq![K::Over, R::WindowSpecification]),
        ],
        R::WindowSpecification => parenthesized(seq![
            opt(seq![K::Partition, K::By, R::ExpressionList]),
            opt(R::OrderByClause),
            opt(R::WindowFrame),
        ]),
        R::WindowFrame => seq![
            alt![K::Rows, K::Range],
            alt![
                seq![K::Between, R::FrameBound, K::And, R::FrameBound],
                R::FrameBound
            ]
        ],
        R::FrameBound => alt![
            seq![K::Unbounded, alt![K::Preceding, K::Following]],
            seq![K::Current, K::Row],
            seq![R::AdditiveExpression, alt![K::Preceding, K::Following]],
        ],
        R::ExpressionList => list(R::Expression, K::Comma),

        // ---- names ----
        R::ColumnReference => seq![ident(), opt(seq![K::Dot, ident()])],
        R::TableName => alt![seq![ident(), opt(seq![K::Dot, ident()])], K::StringLiteral],
        R::FunctionName => alt![ident(), K::Left, K::Right],
        R::DataType => seq![
            ident(),
            opt(parenthesized(list(
                seq![K::NumberLiteral, opt(ident())],
                K::Comma
            ))),
            many(seq![K::LBracket, K::RBracket]),
        ],
        R::Name => ident(),
    }
}
