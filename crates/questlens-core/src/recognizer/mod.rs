//! The grammar engine: parsing with error recovery, and next-token prediction.

mod parser;
mod predict;

pub use predict::{predict_next_tokens, predict_next_tokens_in, Prediction, DEFAULT_STEP_BUDGET};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LexError, ParseError};
use crate::grammar::{self, Grammar, Rule};
use crate::lexer::{tokenize, Token};
use crate::types::Span;
use parser::Parser;

/// A concrete syntax tree node: one matched rule and what it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CstNode {
    pub rule: Rule,
    pub children: Vec<CstElement>,
    /// Set on nodes built by error recovery; their children are raw tokens.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recovered: bool,
}

/// A child of a [`CstNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CstElement {
    Node(CstNode),
    Token(Token),
}

impl CstNode {
    pub fn new(rule: Rule, children: Vec<CstElement>) -> Self {
        Self {
            rule,
            children,
            recovered: false,
        }
    }

    /// Every token under this node, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for child in &self.children {
            match child {
                CstElement::Token(token) => out.push(token),
                CstElement::Node(node) => node.collect_tokens(out),
            }
        }
    }

    /// Source span from the first to the last token, if the node has any.
    pub fn span(&self) -> Option<Span> {
        let tokens = self.tokens();
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(Span::new(first.start, last.end()))
    }

    /// Direct child nodes.
    pub fn child_nodes(&self) -> impl Iterator<Item = &CstNode> {
        self.children.iter().filter_map(|c| match c {
            CstElement::Node(node) => Some(node),
            CstElement::Token(_) => None,
        })
    }

    /// Pre-order search for nodes of `rule` below (and including) this node.
    pub fn find_all(&self, rule: Rule) -> Vec<&CstNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.rule == rule {
                out.push(node);
            }
            let children: Vec<_> = node.child_nodes().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

/// Result of [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutput {
    pub cst: CstNode,
    pub errors: Vec<ParseError>,
}

/// Parses `tokens` from `start` with the QuestDB grammar.
///
/// From [`Rule::Statements`] the parser recovers at statement boundaries and
/// keeps going; any other start rule must match the whole input.
pub fn parse(tokens: &[Token], start: Rule) -> ParseOutput {
    parse_with(grammar::questdb(), tokens, start)
}

/// [`parse`] against an explicit grammar.
pub fn parse_with(grammar: &Grammar, tokens: &[Token], start: Rule) -> ParseOutput {
    let parser = Parser::new(grammar, tokens);
    if start == Rule::Statements {
        parser.statements()
    } else {
        parser.single(start)
    }
}

/// Result of [`parse_sql`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SqlParse {
    pub cst: CstNode,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
}

impl SqlParse {
    pub fn is_valid(&self) -> bool {
        self.lex_errors.is_empty() && self.parse_errors.is_empty()
    }
}

/// Tokenizes and parses a script of `;`-separated statements.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(text), fields(len = text.len())))]
pub fn parse_sql(text: &str) -> SqlParse {
    let tokenized = tokenize(text);
    let output = parse(&tokenized.tokens, Rule::Statements);
    SqlParse {
        cst: output.cst,
        lex_errors: tokenized.errors,
        parse_errors: output.errors,
    }
}
