//! Grammar as data.
//!
//! A grammar is a table of [`Expr`] trees, one per [`Rule`]. The table is built
//! once per process and analysed on construction: every rule and every
//! choice, optional and repetition branch gets its FIRST set (lookahead depth
//! one) and nullability, so the recognizer can skip branches that cannot
//! start with the current token without trying them.

mod questdb;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::PredictionError;
use crate::lexer::{TokenCategory, TokenKind, TokenSet};

macro_rules! rules {
    ($($variant:ident => $name:literal,)*) => {
        /// Named productions of the QuestDB grammar.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            JsonSchema,
        )]
        #[serde(rename_all = "camelCase")]
        pub enum Rule {
            $($variant,)*
        }

        impl Rule {
            pub const ALL: &'static [Rule] = &[$(Rule::$variant,)*];

            /// The rule's camelCase name, e.g. `selectStatement`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Rule::$variant => $name,)*
                }
            }
        }
    };
}

rules! {
    Statements => "statements",
    Statement => "statement",
    SelectStatement => "selectStatement",
    WithClause => "withClause",
    CommonTableExpression => "commonTableExpression",
    QueryExpression => "queryExpression",
    SetOperator => "setOperator",
    QueryPrimary => "queryPrimary",
    SimpleSelect => "simpleSelect",
    SelectList => "selectList",
    SelectItem => "selectItem",
    QualifiedStar => "qualifiedStar",
    Alias => "alias",
    FromClause => "fromClause",
    TableReference => "tableReference",
    TablePrimary => "tablePrimary",
    TimestampDesignation => "timestampDesignation",
    JoinClause => "joinClause",
    JoinType => "joinType",
    WhereClause => "whereClause",
    LatestOnClause => "latestOnClause",
    SampleByClause => "sampleByClause",
    FillClause => "fillClause",
    FillValue => "fillValue",
    AlignToClause => "alignToClause",
    GroupByClause => "groupByClause",
    HavingClause => "havingClause",
    OrderByClause => "orderByClause",
    OrderItem => "orderItem",
    LimitClause => "limitClause",
    InsertStatement => "insertStatement",
    ColumnList => "columnList",
    ValuesClause => "valuesClause",
    UpdateStatement => "updateStatement",
    Assignment => "assignment",
    CreateTableStatement => "createTableStatement",
    TableElement => "tableElement",
    ColumnDefinition => "columnDefinition",
    PartitionByClause => "partitionByClause",
    PartitionUnit => "partitionUnit",
    WalClause => "walClause",
    TtlClause => "ttlClause",
    DedupClause => "dedupClause",
    AlterTableStatement => "alterTableStatement",
    AlterTableAction => "alterTableAction",
    AlterColumnAction => "alterColumnAction",
    DropTableStatement => "dropTableStatement",
    TruncateTableStatement => "truncateTableStatement",
    RenameTableStatement => "renameTableStatement",
    ShowStatement => "showStatement",
    ExplainStatement => "explainStatement",
    CopyStatement => "copyStatement",
    CopyOption => "copyOption",
    DeclareStatement => "declareStatement",
    VacuumTableStatement => "vacuumTableStatement",
    ReindexTableStatement => "reindexTableStatement",
    PivotStatement => "pivotStatement",
    PivotAggregation => "pivotAggregation",
    ImplicitSelect => "implicitSelect",
    Expression => "expression",
    OrExpression => "orExpression",
    AndExpression => "andExpression",
    NotExpression => "notExpression",
    ComparisonExpression => "comparisonExpression",
    ComparisonTail => "comparisonTail",
    ComparisonOperator => "comparisonOperator",
    BitOrExpression => "bitOrExpression",
    BitXorExpression => "bitXorExpression",
    BitAndExpression => "bitAndExpression",
    ShiftExpression => "shiftExpression",
    AdditiveExpression => "additiveExpression",
    MultiplicativeExpression => "multiplicativeExpression",
    UnaryExpression => "unaryExpression",
    PostfixExpression => "postfixExpression",
    PrimaryExpression => "primaryExpression",
    Literal => "literal",
    CastExpression => "castExpression",
    CaseExpression => "caseExpression",
    ExistsExpression => "existsExpression",
    FunctionCall => "functionCall",
    WindowSpecification => "windowSpecification",
    WindowFrame => "windowFrame",
    FrameBound => "frameBound",
    ExpressionList => "expressionList",
    ColumnReference => "columnReference",
    TableName => "tableName",
    FunctionName => "functionName",
    DataType => "dataType",
    Name => "name",
}

impl Rule {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Statement forms that start with a bare table name and so accept
    /// almost any identifier.
    pub const fn is_catch_all_statement(self) -> bool {
        matches!(self, Rule::ImplicitSelect | Rule::PivotStatement)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .iter()
            .copied()
            .find(|r| r.name() == s)
            .ok_or_else(|| PredictionError::UnknownRule(s.to_string()))
    }
}

/// Precomputed lookahead of a branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookahead {
    pub first: TokenSet,
    pub nullable: bool,
}

impl Lookahead {
    /// Whether the branch could start at a token of `kind` (or match nothing).
    pub fn admits(&self, kind: TokenKind) -> bool {
        self.nullable || self.first.contains(kind)
    }
}

/// A sub-expression that the recognizer may choose to enter or skip.
#[derive(Debug, Clone)]
pub struct Branch {
    pub expr: Expr,
    pub lookahead: Lookahead,
}

impl Branch {
    fn new(expr: Expr) -> Self {
        Self {
            expr,
            lookahead: Lookahead::default(),
        }
    }
}

/// A grammar expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Token(TokenKind),
    Category(TokenCategory),
    Rule(Rule),
    Seq(Vec<Expr>),
    /// Ordered choice: the first alternative that matches wins.
    Choice(Vec<Branch>),
    Optional(Box<Branch>),
    Many(Box<Branch>),
}

impl Expr {
    pub fn choice(alternatives: Vec<Expr>) -> Self {
        Expr::Choice(alternatives.into_iter().map(Branch::new).collect())
    }
}

impl From<TokenKind> for Expr {
    fn from(kind: TokenKind) -> Self {
        Expr::Token(kind)
    }
}

impl From<Rule> for Expr {
    fn from(rule: Rule) -> Self {
        Expr::Rule(rule)
    }
}

impl From<TokenCategory> for Expr {
    fn from(category: TokenCategory) -> Self {
        Expr::Category(category)
    }
}

macro_rules! seq {
    ($($e:expr),+ $(,)?) => {
        $crate::grammar::Expr::Seq(vec![$($crate::grammar::Expr::from($e)),+])
    };
}

macro_rules! alt {
    ($($e:expr),+ $(,)?) => {
        $crate::grammar::Expr::choice(vec![$($crate::grammar::Expr::from($e)),+])
    };
}

pub(crate) use alt;
pub(crate) use seq;

pub fn opt(e: impl Into<Expr>) -> Expr {
    Expr::Optional(Box::new(Branch::new(e.into())))
}

pub fn many(e: impl Into<Expr>) -> Expr {
    Expr::Many(Box::new(Branch::new(e.into())))
}

/// `item (sep item)*`
pub fn list(item: impl Into<Expr>, sep: TokenKind) -> Expr {
    let item = item.into();
    seq![item.clone(), many(seq![sep, item])]
}

/// Any identifier-like token.
pub fn ident() -> Expr {
    Expr::Category(TokenCategory::IdentifierLike)
}

/// A rule table with its lookahead analysis.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<Expr>,
    nullable: Vec<bool>,
    first: Vec<TokenSet>,
}

static QUESTDB: LazyLock<Grammar> = LazyLock::new(|| Grammar::new(questdb::define));

/// The process-wide QuestDB grammar.
pub fn questdb() -> &'static Grammar {
    &QUESTDB
}

impl Grammar {
    /// Builds and analyses a grammar from a total rule definition function.
    pub fn new(define: fn(Rule) -> Expr) -> Self {
        let rules: Vec<Expr> = Rule::ALL.iter().map(|r| define(*r)).collect();
        let mut grammar = Self {
            nullable: vec![false; rules.len()],
            first: vec![TokenSet::empty(); rules.len()],
            rules,
        };
        grammar.compute_nullable();
        grammar.compute_first();
        grammar.annotate();
        grammar
    }

    pub fn expr(&self, rule: Rule) -> &Expr {
        &self.rules[rule.index()]
    }

    pub fn nullable(&self, rule: Rule) -> bool {
        self.nullable[rule.index()]
    }

    pub fn first(&self, rule: Rule) -> &TokenSet {
        &self.first[rule.index()]
    }

    /// Whether `rule` could start at a token of `kind` (or match nothing).
    pub fn admits(&self, rule: Rule, kind: TokenKind) -> bool {
        self.nullable(rule) || self.first(rule).contains(kind)
    }

    fn expr_nullable(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Token(_) | Expr::Category(_) => false,
            Expr::Rule(r) => self.nullable[r.index()],
            Expr::Seq(items) => items.iter().all(|e| self.expr_nullable(e)),
            Expr::Choice(alts) => alts.iter().any(|b| self.expr_nullable(&b.expr)),
            Expr::Optional(_) | Expr::Many(_) => true,
        }
    }

    fn expr_first(&self, expr: &Expr, into: &mut TokenSet) {
        match expr {
            Expr::Token(k) => into.insert(*k),
            Expr::Category(c) => {
                into.union_with(&TokenSet::of_category(*c));
            }
            Expr::Rule(r) => {
                into.union_with(&self.first[r.index()]);
            }
            Expr::Seq(items) => {
                for item in items {
                    self.expr_first(item, into);
                    if !self.expr_nullable(item) {
                        break;
                    }
                }
            }
            Expr::Choice(alts) => {
                for b in alts {
                    self.expr_first(&b.expr, into);
                }
            }
            Expr::Optional(b) | Expr::Many(b) => self.expr_first(&b.expr, into),
        }
    }

    fn compute_nullable(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.rules.len() {
                if !self.nullable[i] && self.expr_nullable(&self.rules[i]) {
                    self.nullable[i] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn compute_first(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.rules.len() {
                let mut set = TokenSet::empty();
                self.expr_first(&self.rules[i], &mut set);
                changed |= self.first[i].union_with(&set);
            }
            if !changed {
                break;
            }
        }
    }

    fn annotate(&mut self) {
        let mut rules = std::mem::take(&mut self.rules);
        for expr in &mut rules {
            self.annotate_expr(expr);
        }
        self.rules = rules;
    }

    fn annotate_expr(&self, expr: &mut Expr) {
        match expr {
            Expr::Token(_) | Expr::Category(_) | Expr::Rule(_) => {}
            Expr::Seq(items) => {
                for item in items {
                    self.annotate_expr(item);
                }
            }
            Expr::Choice(alts) => {
                for b in alts {
                    self.annotate_branch(b);
                }
            }
            Expr::Optional(b) | Expr::Many(b) => self.annotate_branch(b),
        }
    }

    fn annotate_branch(&self, branch: &mut Branch) {
        self.annotate_expr(&mut branch.expr);
        let mut first = TokenSet::empty();
        self.expr_first(&branch.expr, &mut first);
        branch.lookahead = Lookahead {
            first,
            nullable: self.expr_nullable(&branch.expr),
        };
    }

    /// Rules that can reach themselves without consuming a token.
    pub fn left_recursive_rules(&self) -> Vec<Rule> {
        Rule::ALL
            .iter()
            .copied()
            .filter(|&rule| {
                let mut seen = vec![false; self.rules.len()];
                let mut stack = Vec::new();
                self.leading_rules(self.expr(rule), &mut stack);
                while let Some(next) = stack.pop() {
                    if next == rule {
                        return true;
                    }
                    if !std::mem::replace(&mut seen[next.index()], true) {
                        self.leading_rules(self.expr(next), &mut stack);
                    }
                }
                false
            })
            .collect()
    }

    fn leading_rules(&self, expr: &Expr, out: &mut Vec<Rule>) {
        match expr {
            Expr::Token(_) | Expr::Category(_) => {}
            Expr::Rule(r) => out.push(*r),
            Expr::Seq(items) => {
                for item in items {
                    self.leading_rules(item, out);
                    if !self.expr_nullable(item) {
                        break;
                    }
                }
            }
            Expr::Choice(alts) => {
                for b in alts {
                    self.leading_rules(&b.expr, out);
                }
            }
            Expr::Optional(b) | Expr::Many(b) => self.leading_rules(&b.expr, out),
        }
    }

    /// Repetitions whose body can match nothing, reported by owning rule.
    pub fn nullable_repetitions(&self) -> Vec<Rule> {
        fn visit(grammar: &Grammar, expr: &Expr, found: &mut bool) {
            match expr {
                Expr::Token(_) | Expr::Category(_) | Expr::Rule(_) => {}
                Expr::Seq(items) => items.iter().for_each(|e| visit(grammar, e, found)),
                Expr::Choice(alts) => alts.iter().for_each(|b| visit(grammar, &b.expr, found)),
                Expr::Optional(b) => visit(grammar, &b.expr, found),
                Expr::Many(b) => {
                    *found |= b.lookahead.nullable;
                    visit(grammar, &b.expr, found);
                }
            }
        }
        Rule::ALL
            .iter()
            .copied()
            .filter(|&rule| {
                let mut found = false;
                visit(self, self.expr(rule), &mut found);
                found
            })
            .collect()
    }
}
