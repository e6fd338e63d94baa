//! Next-token prediction.
//!
//! Unlike [`parse`](super::parse), prediction does not commit to the first
//! alternative that matches: it follows every path through the grammar that
//! consumes the whole token prefix and reports what each one would accept
//! next. Paths are explored from an explicit work list; each path carries its
//! continuation and rule stack as shared linked lists, so forking a path at a
//! choice costs two reference-count bumps.

#[cfg(feature = "tracing")]
use tracing::debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::PredictionError;
use crate::grammar::{self, Branch, Expr, Grammar, Lookahead, Rule};
use crate::lexer::{Token, TokenKind};

/// Work-list steps allowed per prediction before giving up.
pub const DEFAULT_STEP_BUDGET: usize = 500_000;

/// One token kind admissible after the prefix, with the rules leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub next_token_kind: TokenKind,
    /// Outermost rule first.
    pub rule_stack: Vec<Rule>,
}

impl Prediction {
    pub fn innermost_rule(&self) -> Option<Rule> {
        self.rule_stack.last().copied()
    }

    pub fn passes_through(&self, rule: Rule) -> bool {
        self.rule_stack.contains(&rule)
    }
}

/// Predicts the tokens that may follow `tokens` when matching `rule`.
///
/// Returns an empty list when no path through `rule` consumes the prefix.
pub fn predict_next_tokens(
    rule: Rule,
    tokens: &[Token],
) -> Result<Vec<Prediction>, PredictionError> {
    predict_next_tokens_in(grammar::questdb(), rule, tokens, DEFAULT_STEP_BUDGET)
}

/// [`predict_next_tokens`] against an explicit grammar and step budget.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(grammar, tokens), fields(tokens = tokens.len()))
)]
pub fn predict_next_tokens_in(
    grammar: &Grammar,
    rule: Rule,
    tokens: &[Token],
    budget: usize,
) -> Result<Vec<Prediction>, PredictionError> {
    Predictor {
        grammar,
        tokens,
        budget,
        seen: HashSet::new(),
        out: Vec::new(),
    }
    .run(rule)
}

#[derive(Clone, Copy)]
enum Frame<'g> {
    Expr(&'g Expr),
    /// Another iteration of a repetition whose last iteration began at `start`.
    Repeat { body: &'g Branch, start: usize },
    /// Leaves the innermost rule.
    Exit,
}

struct Cont<'g> {
    frame: Frame<'g>,
    next: Option<Rc<Cont<'g>>>,
}

struct RuleNode {
    rule: Rule,
    parent: Option<Rc<RuleNode>>,
}

#[derive(Clone)]
struct Path<'g> {
    pos: usize,
    conts: Option<Rc<Cont<'g>>>,
    rules: Option<Rc<RuleNode>>,
}

impl<'g> Path<'g> {
    fn then(mut self, frame: Frame<'g>) -> Self {
        self.conts = Some(Rc::new(Cont {
            frame,
            next: self.conts.take(),
        }));
        self
    }

    fn enter(self, rule: Rule, body: &'g Expr) -> Self {
        let mut path = self.then(Frame::Exit).then(Frame::Expr(body));
        path.rules = Some(Rc::new(RuleNode {
            rule,
            parent: path.rules.take(),
        }));
        path
    }

    fn rule_stack(&self) -> Vec<Rule> {
        let mut stack = Vec::new();
        let mut node = self.rules.as_deref();
        while let Some(n) = node {
            stack.push(n.rule);
            node = n.parent.as_deref();
        }
        stack.reverse();
        stack
    }
}

struct Predictor<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [Token],
    budget: usize,
    seen: HashSet<(TokenKind, Vec<Rule>)>,
    out: Vec<Prediction>,
}

impl<'g> Predictor<'g, '_> {
    fn run(mut self, start: Rule) -> Result<Vec<Prediction>, PredictionError> {
        let root = Path {
            pos: 0,
            conts: None,
            rules: None,
        };
        let mut work = vec![root.enter(start, self.grammar.expr(start))];
        let mut steps = 0usize;

        while let Some(mut path) = work.pop() {
            steps += 1;
            if steps > self.budget {
                #[cfg(feature = "tracing")]
                debug!(budget = self.budget, live = work.len(), "prediction budget exhausted");
                return Err(PredictionError::BudgetExceeded {
                    budget: self.budget,
                });
            }
            // An empty continuation means `start` matched and nothing may follow.
            let Some(cont) = path.conts.take() else {
                continue;
            };
            path.conts = cont.next.clone();

            match cont.frame {
                Frame::Exit => {
                    path.rules = path.rules.and_then(|n| n.parent.clone());
                    work.push(path);
                }
                Frame::Repeat { body, start } => {
                    // An iteration that consumed nothing cannot make progress.
                    if path.pos == start {
                        work.push(path);
                    } else {
                        self.fork_repetition(path, body, &mut work);
                    }
                }
                Frame::Expr(expr) => self.step(path, expr, &mut work),
            }
        }

        Ok(self.out)
    }

    fn step(&mut self, mut path: Path<'g>, expr: &'g Expr, work: &mut Vec<Path<'g>>) {
        let current = self.tokens.get(path.pos).map(|t| t.kind);
        match expr {
            Expr::Token(kind) => match current {
                None => self.emit(*kind, &path),
                Some(k) if k == *kind => {
                    path.pos += 1;
                    work.push(path);
                }
                Some(_) => {}
            },
            Expr::Category(category) => match current {
                None => match category.representative() {
                    Some(kind) => self.emit(kind, &path),
                    None => {
                        for kind in category.members() {
                            self.emit(kind, &path);
                        }
                    }
                },
                Some(k) if k.is_in(*category) => {
                    path.pos += 1;
                    work.push(path);
                }
                Some(_) => {}
            },
            Expr::Rule(rule) => {
                if current.map_or(true, |k| self.grammar.admits(*rule, k)) {
                    work.push(path.enter(*rule, self.grammar.expr(*rule)));
                }
            }
            Expr::Seq(items) => {
                for item in items.iter().rev() {
                    path = path.then(Frame::Expr(item));
                }
                work.push(path);
            }
            Expr::Choice(alternatives) => {
                // Reversed so the first alternative is explored first.
                for branch in alternatives.iter().rev() {
                    if admits(&branch.lookahead, current) {
                        work.push(path.clone().then(Frame::Expr(&branch.expr)));
                    }
                }
            }
            Expr::Optional(branch) => {
                let enter = admits(&branch.lookahead, current);
                if enter {
                    work.push(path.clone());
                    work.push(path.then(Frame::Expr(&branch.expr)));
                } else {
                    work.push(path);
                }
            }
            Expr::Many(branch) => self.fork_repetition(path, branch, work),
        }
    }

    /// Queues both skipping `body` and running one more iteration of it.
    fn fork_repetition(&self, path: Path<'g>, body: &'g Branch, work: &mut Vec<Path<'g>>) {
        let current = self.tokens.get(path.pos).map(|t| t.kind);
        if !admits(&body.lookahead, current) {
            work.push(path);
            return;
        }
        let start = path.pos;
        work.push(path.clone());
        work.push(
            path.then(Frame::Repeat { body, start })
                .then(Frame::Expr(&body.expr)),
        );
    }

    fn emit(&mut self, kind: TokenKind, path: &Path<'g>) {
        let rule_stack = path.rule_stack();
        if self.seen.insert((kind, rule_stack.clone())) {
            self.out.push(Prediction {
                next_token_kind: kind,
                rule_stack,
            });
        }
    }
}

fn admits(lookahead: &Lookahead, current: Option<TokenKind>) -> bool {
    current.map_or(true, |k| lookahead.admits(k))
}
