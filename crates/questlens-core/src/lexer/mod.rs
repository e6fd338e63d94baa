//! QuestDB SQL tokenizer.
//!
//! [`tokenize`] is total: it never panics and always returns every token it
//! could recognize, together with the errors for the spans it could not.
//! Whitespace and comments are skipped but offsets in tokens and errors always
//! refer to the original text.

mod token;

pub use token::{Token, TokenCategories, TokenCategory, TokenClass, TokenKind, TokenSet};

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{LexError, LexErrorKind};
use crate::types::Span;

/// Output of [`tokenize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
    pub comments: Vec<Comment>,
}

/// A skipped `--` or `/* */` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    /// From the opening marker through the closing `*/` or newline.
    pub span: Span,
    /// Runs to end of input: a line comment without a newline, or an
    /// unterminated block comment.
    pub open: bool,
}

impl Comment {
    /// Whether a cursor at `offset` sits inside the comment text.
    pub fn covers(&self, offset: usize) -> bool {
        self.span.start < offset && (offset < self.span.end || self.open)
    }
}

/// Literal patterns, most specific first. Each is anchored at the scan point
/// and must end on a word boundary.
static LITERAL_PATTERNS: LazyLock<Vec<(Regex, TokenKind)>> = LazyLock::new(|| {
    [
        (r"^\d+\.\d+m\b", TokenKind::DecimalLiteral),
        (r"^\d+L\b", TokenKind::LongLiteral),
        (r"^\d+(?:ns|us|ms|[smhdwMy])\b", TokenKind::DurationLiteral),
        (r"^0[xX][0-9a-fA-F]+\b", TokenKind::NumberLiteral),
        (
            r"^(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?",
            TokenKind::NumberLiteral,
        ),
        (r"^##[01]+\b", TokenKind::GeohashLiteral),
        (r"^#[0-9a-zA-Z]+(?:/\d+)?\b", TokenKind::GeohashLiteral),
    ]
    .into_iter()
    .map(|(pattern, kind)| {
        // Patterns are fixed at compile time; a failure here is a programming error.
        (Regex::new(pattern).expect("invalid literal pattern"), kind)
    })
    .collect()
});

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    out: Tokenized,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            out: Tokenized::default(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let text = &self.src[self.pos..self.pos + len];
        self.out.tokens.push(Token::new(kind, text, self.pos));
        self.pos += len;
    }

    fn error(&mut self, kind: LexErrorKind, offset: usize, len: usize) {
        let text = self.src[offset..offset + len].to_string();
        self.out.errors.push(LexError::new(kind, offset, text));
    }

    fn run(mut self) -> Tokenized {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if self.rest().starts_with("--") {
                self.skip_line_comment();
            } else if self.rest().starts_with("/*") {
                self.skip_block_comment();
            } else if c == '\'' {
                self.scan_quoted('\'', TokenKind::StringLiteral);
            } else if c == '"' {
                self.scan_quoted('"', TokenKind::QuotedIdentifier);
            } else if is_ident_start(c) {
                self.scan_word();
            } else if c == '@' || (c == ':' && self.peek_second().is_some_and(is_ident_start)) {
                self.scan_variable(c);
            } else if !self.scan_literal() && !self.scan_symbol() {
                let len = c.len_utf8();
                self.error(LexErrorKind::UnexpectedCharacter, self.pos, len);
                self.pos += len;
            }
        }
        self.out
    }

    fn skip_line_comment(&mut self) {
        let start = self.pos;
        let open = match self.rest().find('\n') {
            Some(i) => {
                self.pos += i + 1;
                false
            }
            None => {
                self.pos = self.src.len();
                true
            }
        };
        self.comment(start, open);
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        let open = match self.rest()[2..].find("*/") {
            Some(i) => {
                self.pos += i + 4;
                false
            }
            None => {
                let len = self.src.len() - self.pos;
                self.error(LexErrorKind::UnterminatedComment, self.pos, 2.min(len));
                self.pos = self.src.len();
                true
            }
        };
        self.comment(start, open);
    }

    fn comment(&mut self, start: usize, open: bool) {
        self.out.comments.push(Comment {
            span: Span::new(start, self.pos),
            open,
        });
    }

    /// Scans a quoted span where a doubled delimiter is an escape.
    fn scan_quoted(&mut self, quote: char, kind: TokenKind) {
        let body = &self.rest()[1..];
        let mut offset = 0;
        loop {
            match body[offset..].find(quote) {
                Some(i) => {
                    let after = offset + i + 1;
                    if body[after..].starts_with(quote) {
                        offset = after + 1;
                    } else {
                        self.push(kind, after + 1);
                        return;
                    }
                }
                None => {
                    let error_kind = if kind == TokenKind::StringLiteral {
                        LexErrorKind::UnterminatedString
                    } else {
                        LexErrorKind::UnterminatedQuotedIdentifier
                    };
                    self.error(error_kind, self.pos, 1);
                    let len = self.src.len() - self.pos;
                    self.push(kind, len);
                    if let Some(last) = self.out.tokens.last_mut() {
                        last.unterminated = true;
                    }
                    return;
                }
            }
        }
    }

    fn scan_word(&mut self) {
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(self.rest().len(), |(i, _)| i);
        let word = &self.rest()[..len];
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        self.push(kind, len);
    }

    fn scan_variable(&mut self, sigil: char) {
        let name_len = self.rest()[1..]
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(self.rest().len() - 1, |(i, _)| i);
        if name_len == 0 {
            self.error(LexErrorKind::UnexpectedCharacter, self.pos, sigil.len_utf8());
            self.pos += sigil.len_utf8();
        } else {
            self.push(TokenKind::Variable, 1 + name_len);
        }
    }

    fn scan_literal(&mut self) -> bool {
        let rest = self.rest();
        let starts_numeric = rest.starts_with(|c: char| c.is_ascii_digit() || c == '#')
            || (rest.starts_with('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()));
        if !starts_numeric {
            return false;
        }
        for (pattern, kind) in LITERAL_PATTERNS.iter() {
            if let Some(m) = pattern.find(rest) {
                if m.end() > 0 {
                    self.push(*kind, m.end());
                    return true;
                }
            }
        }
        false
    }

    fn scan_symbol(&mut self) -> bool {
        let rest = self.rest();
        let matched = TokenKind::operators()
            .iter()
            .chain(TokenKind::punctuation())
            .find(|(text, _)| rest.starts_with(text));
        match matched {
            Some((text, kind)) => {
                self.push(*kind, text.len());
                true
            }
            None => false,
        }
    }
}

/// Splits `text` into tokens, collecting errors for unrecognized spans.
pub fn tokenize(text: &str) -> Tokenized {
    Lexer::new(text).run()
}
