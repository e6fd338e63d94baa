//! Backtracking recursive-descent parser over a [`Grammar`].
//!
//! Choices are ordered: the first alternative that matches wins. Branches
//! whose FIRST set excludes the current token are skipped without being tried.
//! A failed probe restores the cursor and drops the children it built.

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{CstElement, CstNode, ParseOutput};
use crate::error::{ParseError, ParseErrorKind};
use crate::grammar::{Branch, Expr, Grammar, Rule};
use crate::lexer::{Token, TokenKind, TokenSet};

/// Nesting limit, counted in rules entered past the start of the enclosing
/// counted rule (one per parenthesis or subquery level). Deeper input fails
/// with [`ParseErrorKind::TooDeep`].
pub(crate) const MAX_NESTING_DEPTH: usize = 64;

pub(super) struct Parser<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    /// Start of the innermost rule that counted towards `depth`.
    nest_start: usize,
    too_deep: bool,
    /// Furthest position any probe failed at, and what it expected there.
    furthest: usize,
    expected: TokenSet,
}

impl<'g, 't> Parser<'g, 't> {
    pub(super) fn new(grammar: &'g Grammar, tokens: &'t [Token]) -> Self {
        Self {
            grammar,
            tokens,
            pos: 0,
            depth: 0,
            nest_start: 0,
            too_deep: false,
            furthest: 0,
            expected: TokenSet::empty(),
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn note_failure(&mut self, expected: TokenKind) {
        if self.advance_furthest() {
            self.expected.insert(expected);
        }
    }

    fn note_failures(&mut self, expected: &TokenSet) {
        if self.advance_furthest() {
            self.expected.union_with(expected);
        }
    }

    /// Moves the furthest failure point to the cursor if it is further along.
    /// Returns whether failures at the cursor should be recorded.
    fn advance_furthest(&mut self) -> bool {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected = TokenSet::empty();
        }
        self.pos == self.furthest
    }

    fn reset_failures(&mut self) {
        self.furthest = self.pos;
        self.expected = TokenSet::empty();
        self.too_deep = false;
    }

    fn admits(&self, branch: &Branch) -> bool {
        match self.peek_kind() {
            Some(kind) => branch.lookahead.admits(kind),
            None => branch.lookahead.nullable,
        }
    }

    /// Matches `expr` at the cursor, appending CST children to `out`.
    fn parse_expr(&mut self, expr: &'g Expr, out: &mut Vec<CstElement>) -> bool {
        match expr {
            Expr::Token(kind) => match self.peek() {
                Some(token) if token.kind == *kind => {
                    out.push(CstElement::Token(token.clone()));
                    self.pos += 1;
                    true
                }
                _ => {
                    self.note_failure(*kind);
                    false
                }
            },
            Expr::Category(category) => match self.peek() {
                Some(token) if token.kind.is_in(*category) => {
                    out.push(CstElement::Token(token.clone()));
                    self.pos += 1;
                    true
                }
                _ => {
                    match category.representative() {
                        Some(kind) => self.note_failure(kind),
                        None => self.note_failures(&TokenSet::of_category(*category)),
                    }
                    false
                }
            },
            Expr::Rule(rule) => self.parse_rule(*rule, out),
            Expr::Seq(items) => {
                let (save, len) = (self.pos, out.len());
                for item in items {
                    if !self.parse_expr(item, out) {
                        self.pos = save;
                        out.truncate(len);
                        return false;
                    }
                }
                true
            }
            Expr::Choice(alternatives) => {
                for branch in alternatives {
                    if !self.admits(branch) {
                        self.note_failures(&branch.lookahead.first);
                        continue;
                    }
                    let (save, len) = (self.pos, out.len());
                    if self.parse_expr(&branch.expr, out) {
                        return true;
                    }
                    self.pos = save;
                    out.truncate(len);
                }
                false
            }
            Expr::Optional(branch) => {
                if self.admits(branch) {
                    let (save, len) = (self.pos, out.len());
                    if !self.parse_expr(&branch.expr, out) {
                        self.pos = save;
                        out.truncate(len);
                    }
                } else {
                    self.note_failures(&branch.lookahead.first);
                }
                true
            }
            Expr::Many(branch) => {
                loop {
                    if !self.admits(branch) {
                        self.note_failures(&branch.lookahead.first);
                        break;
                    }
                    let (save, len) = (self.pos, out.len());
                    if !self.parse_expr(&branch.expr, out) {
                        self.pos = save;
                        out.truncate(len);
                        break;
                    }
                    if self.pos == save {
                        break;
                    }
                }
                true
            }
        }
    }

    fn parse_rule(&mut self, rule: Rule, out: &mut Vec<CstElement>) -> bool {
        if let Some(kind) = self.peek_kind() {
            if !self.grammar.admits(rule, kind) {
                self.note_failures(self.grammar.first(rule));
                return false;
            }
        }
        // Rule chains entered without consuming input are bounded by the
        // grammar; only nesting past consumed tokens counts.
        let nested = self.pos > self.nest_start;
        let outer = self.nest_start;
        if nested {
            if self.depth >= MAX_NESTING_DEPTH {
                self.too_deep = true;
                return false;
            }
            self.depth += 1;
            self.nest_start = self.pos;
        }
        let mut children = Vec::new();
        let matched = self.parse_expr(self.grammar.expr(rule), &mut children);
        if nested {
            self.depth -= 1;
            self.nest_start = outer;
        }
        if matched {
            out.push(CstElement::Node(CstNode::new(rule, children)));
        }
        matched
    }

    fn at_statement_end(&self) -> bool {
        matches!(self.peek_kind(), None | Some(TokenKind::Semicolon))
    }

    fn offset_of(&self, index: usize) -> usize {
        match self.tokens.get(index) {
            Some(token) => token.start,
            None => self.tokens.last().map_or(0, Token::end),
        }
    }

    fn error_at_furthest(&self, fallback: ParseErrorKind) -> ParseError {
        let kind = if self.too_deep {
            ParseErrorKind::TooDeep
        } else if self.furthest >= self.tokens.len() {
            ParseErrorKind::UnexpectedEof
        } else {
            fallback
        };
        ParseError::new(
            kind,
            self.offset_of(self.furthest),
            self.tokens.get(self.furthest).map(|t| t.text.clone()),
            self.expected.iter().collect(),
        )
    }

    /// Index of the first `;` at or after `from`, or the end of input.
    fn next_semicolon(&self, from: usize) -> usize {
        self.tokens[from..]
            .iter()
            .position(|t| t.kind == TokenKind::Semicolon)
            .map_or(self.tokens.len(), |i| from + i)
    }

    /// Whether a statement form other than the catch-alls can start at `kind`.
    fn opens_explicit_statement(&self, kind: TokenKind) -> bool {
        match self.grammar.expr(Rule::Statement) {
            Expr::Choice(forms) => forms.iter().any(|form| {
                !matches!(form.expr, Expr::Rule(rule) if rule.is_catch_all_statement())
                    && form.lookahead.admits(kind)
            }),
            _ => self.grammar.admits(Rule::Statement, kind),
        }
    }

    fn recovered_statement(&self, from: usize, to: usize) -> CstElement {
        let children = self.tokens[from..to]
            .iter()
            .cloned()
            .map(CstElement::Token)
            .collect();
        CstElement::Node(CstNode {
            rule: Rule::Statement,
            children,
            recovered: true,
        })
    }

    /// Parses `;`-separated statements, resynchronizing after each failure.
    pub(super) fn statements(mut self) -> ParseOutput {
        let mut children = Vec::new();
        let mut errors = Vec::new();
        // Set after a failure inside a statement; the tokens up to the next `;`
        // belong to the same error.
        let mut recovering = false;

        while let Some(token) = self.peek() {
            if token.kind == TokenKind::Semicolon {
                children.push(CstElement::Token(token.clone()));
                self.pos += 1;
                recovering = false;
                continue;
            }

            let start = self.pos;
            if recovering && !self.opens_explicit_statement(token.kind) {
                // Leftovers of the failed statement up to the next `;`.
                let resume = self.next_semicolon(start);
                #[cfg(feature = "tracing")]
                trace!(start, resume, "folding leftovers into recovered statement");
                let leftovers = self.tokens[start..resume].iter().cloned().map(CstElement::Token);
                let folded = match children.last_mut() {
                    Some(CstElement::Node(node)) if node.recovered => {
                        node.children.extend(leftovers);
                        true
                    }
                    _ => false,
                };
                if !folded {
                    children.push(self.recovered_statement(start, resume));
                }
                self.pos = resume;
                continue;
            }

            self.reset_failures();
            let mut statement = Vec::new();
            let matched = self.parse_rule(Rule::Statement, &mut statement);

            if matched && self.at_statement_end() {
                children.extend(statement);
                recovering = false;
                continue;
            }

            if matched {
                // Committed statement followed by tokens that fit nowhere.
                if self.furthest < self.pos {
                    self.furthest = self.pos;
                    self.expected = TokenSet::empty();
                }
                if self.furthest == self.pos {
                    self.expected.insert(TokenKind::Semicolon);
                }
                let resume = self.furthest.max(self.pos + 1).min(self.tokens.len());
                #[cfg(feature = "tracing")]
                trace!(start, stop = self.pos, resume, "statement committed, trailing tokens skipped");
                errors.push(self.error_at_furthest(ParseErrorKind::MismatchedToken));
                children.extend(statement);
                children.push(self.recovered_statement(self.pos, resume));
                self.pos = resume;
                recovering = true;
            } else if self.furthest == start && !self.too_deep {
                // No statement form admits this token: skip to the next `;`.
                if !recovering {
                    errors.push(ParseError::new(
                        ParseErrorKind::NoViableAlternative,
                        self.offset_of(start),
                        Some(self.tokens[start].text.clone()),
                        self.expected.iter().collect(),
                    ));
                }
                let resume = self.next_semicolon(start);
                #[cfg(feature = "tracing")]
                trace!(start, resume, "no viable statement, resynchronizing to semicolon");
                children.push(self.recovered_statement(start, resume));
                self.pos = resume;
            } else {
                // Failed inside a statement: keep what matched, resume at the failure.
                let resume = self.furthest.max(start + 1).min(self.tokens.len());
                #[cfg(feature = "tracing")]
                trace!(start, resume, "statement failed after consuming tokens");
                errors.push(self.error_at_furthest(ParseErrorKind::MismatchedToken));
                children.push(self.recovered_statement(start, resume));
                self.pos = resume;
                recovering = true;
            }
        }

        ParseOutput {
            cst: CstNode::new(Rule::Statements, children),
            errors,
        }
    }

    /// Parses the whole input as one `rule`, without recovery.
    pub(super) fn single(mut self, rule: Rule) -> ParseOutput {
        let mut children = Vec::new();
        let matched = self.parse_rule(rule, &mut children);
        let mut errors = Vec::new();

        if matched && self.pos == self.tokens.len() {
            if let Some(CstElement::Node(node)) = children.pop() {
                return ParseOutput { cst: node, errors };
            }
        }

        if matched {
            errors.push(ParseError::new(
                ParseErrorKind::MismatchedToken,
                self.offset_of(self.pos),
                self.peek().map(|t| t.text.clone()),
                Vec::new(),
            ));
        } else {
            errors.push(self.error_at_furthest(ParseErrorKind::MismatchedToken));
        }
        let tokens = self.tokens.iter().cloned().map(CstElement::Token).collect();
        ParseOutput {
            cst: CstNode {
                rule,
                children: tokens,
                recovered: true,
            },
            errors,
        }
    }
}
