//! Token kinds, categories and the keyword table.
//!
//! Every kind belongs to exactly one [`TokenClass`] and carries a set of
//! [`TokenCategory`] tags. Grammar rules match identifier positions through the
//! [`TokenCategory::IdentifierLike`] tag, which plain identifiers, quoted
//! identifiers and every non-reserved keyword share.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::types::Span;

/// Coarse classification of a token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TokenClass {
    Punctuation,
    Operator,
    Literal,
    Identifier,
    ReservedKeyword,
    NonReservedKeyword,
}

macro_rules! token_kinds {
    (
        punctuation { $($p:ident => $ptext:literal,)* }
        operators { $($o:ident => $otext:literal,)* }
        literals { $($l:ident => $ltext:literal,)* }
        identifiers { $($i:ident => $itext:literal,)* }
        reserved { $($r:ident => $rtext:literal,)* }
        non_reserved { $($n:ident => $ntext:literal,)* }
    ) => {
        /// Every kind of token the lexer produces.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            JsonSchema,
        )]
        pub enum TokenKind {
            $($p,)*
            $($o,)*
            $($l,)*
            $($i,)*
            $($r,)*
            $($n,)*
        }

        impl TokenKind {
            /// All kinds, in declaration order.
            pub const ALL: &'static [TokenKind] = &[
                $(TokenKind::$p,)*
                $(TokenKind::$o,)*
                $(TokenKind::$l,)*
                $(TokenKind::$i,)*
                $(TokenKind::$r,)*
                $(TokenKind::$n,)*
            ];

            pub const COUNT: usize = Self::ALL.len();

            pub const fn class(self) -> TokenClass {
                match self {
                    $(TokenKind::$p => TokenClass::Punctuation,)*
                    $(TokenKind::$o => TokenClass::Operator,)*
                    $(TokenKind::$l => TokenClass::Literal,)*
                    $(TokenKind::$i => TokenClass::Identifier,)*
                    $(TokenKind::$r => TokenClass::ReservedKeyword,)*
                    $(TokenKind::$n => TokenClass::NonReservedKeyword,)*
                }
            }

            /// Display text: the symbol for punctuation and operators, the
            /// uppercase word for keywords, a description otherwise.
            pub const fn text(self) -> &'static str {
                match self {
                    $(TokenKind::$p => $ptext,)*
                    $(TokenKind::$o => $otext,)*
                    $(TokenKind::$l => $ltext,)*
                    $(TokenKind::$i => $itext,)*
                    $(TokenKind::$r => $rtext,)*
                    $(TokenKind::$n => $ntext,)*
                }
            }

            /// Variant name, e.g. `Select` or `StringLiteral`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(TokenKind::$p => stringify!($p),)*
                    $(TokenKind::$o => stringify!($o),)*
                    $(TokenKind::$l => stringify!($l),)*
                    $(TokenKind::$i => stringify!($i),)*
                    $(TokenKind::$r => stringify!($r),)*
                    $(TokenKind::$n => stringify!($n),)*
                }
            }
        }

        const PUNCTUATION_TABLE: &[(&str, TokenKind)] = &[$(($ptext, TokenKind::$p),)*];
        const OPERATOR_TABLE: &[(&str, TokenKind)] = &[$(($otext, TokenKind::$o),)*];
        const KEYWORD_TABLE: &[(&str, TokenKind)] = &[
            $(($rtext, TokenKind::$r),)*
            $(($ntext, TokenKind::$n),)*
        ];
    };
}

token_kinds! {
    punctuation {
        LParen => "(",
        RParen => ")",
        LBracket => "[",
        RBracket => "]",
        Comma => ",",
        Semicolon => ";",
        Dot => ".",
    }
    operators {
        ShiftLeftEq => "<<=",
        ShiftRightEq => ">>=",
        ShiftLeft => "<<",
        ShiftRight => ">>",
        LessEq => "<=",
        GreaterEq => ">=",
        LtGt => "<>",
        NotEq => "!=",
        NotTilde => "!~",
        Concat => "||",
        DoubleColon => "::",
        ColonEq => ":=",
        Eq => "=",
        Less => "<",
        Greater => ">",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        BitOr => "|",
        BitAnd => "&",
        BitXor => "^",
        Tilde => "~",
    }
    literals {
        StringLiteral => "string literal",
        NumberLiteral => "number",
        DecimalLiteral => "decimal literal",
        LongLiteral => "long literal",
        DurationLiteral => "duration",
        GeohashLiteral => "geohash literal",
        Variable => "variable",
    }
    identifiers {
        Identifier => "identifier",
        QuotedIdentifier => "quoted identifier",
    }
    reserved {
        All => "ALL",
        Alter => "ALTER",
        And => "AND",
        As => "AS",
        Asof => "ASOF",
        Between => "BETWEEN",
        By => "BY",
        Case => "CASE",
        Cast => "CAST",
        Copy => "COPY",
        Create => "CREATE",
        Cross => "CROSS",
        Distinct => "DISTINCT",
        Drop => "DROP",
        Else => "ELSE",
        End => "END",
        Except => "EXCEPT",
        Explain => "EXPLAIN",
        False => "FALSE",
        From => "FROM",
        Full => "FULL",
        Group => "GROUP",
        Having => "HAVING",
        Ilike => "ILIKE",
        In => "IN",
        Inner => "INNER",
        Insert => "INSERT",
        Intersect => "INTERSECT",
        Into => "INTO",
        Is => "IS",
        Join => "JOIN",
        Latest => "LATEST",
        Left => "LEFT",
        Like => "LIKE",
        Limit => "LIMIT",
        Lt => "LT",
        Not => "NOT",
        Null => "NULL",
        On => "ON",
        Or => "OR",
        Order => "ORDER",
        Outer => "OUTER",
        Over => "OVER",
        Partition => "PARTITION",
        Rename => "RENAME",
        Right => "RIGHT",
        Sample => "SAMPLE",
        Select => "SELECT",
        Set => "SET",
        Show => "SHOW",
        Splice => "SPLICE",
        Table => "TABLE",
        Then => "THEN",
        True => "TRUE",
        Truncate => "TRUNCATE",
        Union => "UNION",
        Update => "UPDATE",
        Values => "VALUES",
        When => "WHEN",
        Where => "WHERE",
        With => "WITH",
    }
    non_reserved {
        Abort => "ABORT",
        Add => "ADD",
        Align => "ALIGN",
        Asc => "ASC",
        Atomic => "ATOMIC",
        Attach => "ATTACH",
        Batch => "BATCH",
        Bypass => "BYPASS",
        Cache => "CACHE",
        Calendar => "CALENDAR",
        Cancel => "CANCEL",
        Capacity => "CAPACITY",
        Column => "COLUMN",
        Columns => "COLUMNS",
        Current => "CURRENT",
        Day => "DAY",
        Days => "DAYS",
        Declare => "DECLARE",
        Dedup => "DEDUP",
        Delimiter => "DELIMITER",
        Desc => "DESC",
        Detach => "DETACH",
        Disable => "DISABLE",
        Enable => "ENABLE",
        Error => "ERROR",
        Exists => "EXISTS",
        Fill => "FILL",
        First => "FIRST",
        Following => "FOLLOWING",
        For => "FOR",
        Format => "FORMAT",
        Header => "HEADER",
        Hour => "HOUR",
        Hours => "HOURS",
        If => "IF",
        Index => "INDEX",
        Keys => "KEYS",
        Last => "LAST",
        Linear => "LINEAR",
        List => "LIST",
        Month => "MONTH",
        Months => "MONTHS",
        Nocache => "NOCACHE",
        None => "NONE",
        Nulls => "NULLS",
        Observation => "OBSERVATION",
        Offset => "OFFSET",
        Parameters => "PARAMETERS",
        Partitions => "PARTITIONS",
        Pivot => "PIVOT",
        Preceding => "PRECEDING",
        Prev => "PREV",
        Range => "RANGE",
        Reindex => "REINDEX",
        Resume => "RESUME",
        Row => "ROW",
        Rows => "ROWS",
        SkipColumn => "SKIP_COLUMN",
        SkipRow => "SKIP_ROW",
        Symbol => "SYMBOL",
        Tables => "TABLES",
        Time => "TIME",
        Timestamp => "TIMESTAMP",
        To => "TO",
        Ttl => "TTL",
        Type => "TYPE",
        Unbounded => "UNBOUNDED",
        Upsert => "UPSERT",
        Vacuum => "VACUUM",
        Wal => "WAL",
        Week => "WEEK",
        Weeks => "WEEKS",
        Year => "YEAR",
        Years => "YEARS",
        Zone => "ZONE",
    }
}

const _: () = assert!(TokenKind::COUNT <= TokenSet::CAPACITY);

static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> =
    LazyLock::new(|| KEYWORD_TABLE.iter().copied().collect());

impl TokenKind {
    /// Looks up a scanned word in the keyword table, case-insensitively.
    ///
    /// Only ASCII letters are folded, so a word with non-ASCII letters is never
    /// a keyword.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        if word.len() > 16 {
            return None;
        }
        KEYWORDS.get(word.to_ascii_uppercase().as_str()).copied()
    }

    /// Operators in match order (longest first).
    pub(crate) fn operators() -> &'static [(&'static str, TokenKind)] {
        OPERATOR_TABLE
    }

    pub(crate) fn punctuation() -> &'static [(&'static str, TokenKind)] {
        PUNCTUATION_TABLE
    }

    pub fn categories(self) -> TokenCategories {
        use TokenCategory as C;
        match self.class() {
            TokenClass::Punctuation => TokenCategories::of(&[C::Punctuation]),
            TokenClass::Operator => TokenCategories::of(&[C::Operator]),
            TokenClass::Literal => TokenCategories::of(&[C::Literal]),
            TokenClass::Identifier => TokenCategories::of(&[C::IdentifierLike]),
            TokenClass::ReservedKeyword => TokenCategories::of(&[C::Keyword, C::Reserved]),
            TokenClass::NonReservedKeyword => {
                TokenCategories::of(&[C::Keyword, C::NonReserved, C::IdentifierLike])
            }
        }
    }

    pub fn is_in(self, category: TokenCategory) -> bool {
        self.categories().contains(category)
    }

    pub fn is_keyword(self) -> bool {
        self.is_in(TokenCategory::Keyword)
    }

    pub fn is_reserved(self) -> bool {
        self.class() == TokenClass::ReservedKeyword
    }

    /// Punctuation, operators and literals: never offered as keywords.
    pub fn is_internal(self) -> bool {
        matches!(
            self.class(),
            TokenClass::Punctuation | TokenClass::Operator | TokenClass::Literal
        )
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Category tags a token kind can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum TokenCategory {
    Punctuation,
    Operator,
    Literal,
    Keyword,
    Reserved,
    NonReserved,
    IdentifierLike,
}

impl TokenCategory {
    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    /// The kind reported when prediction reaches a position matched by this
    /// category, if the category has a single stand-in.
    pub const fn representative(self) -> Option<TokenKind> {
        match self {
            TokenCategory::IdentifierLike => Some(TokenKind::Identifier),
            _ => None,
        }
    }

    /// Every kind tagged with this category.
    pub fn members(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.iter().copied().filter(move |k| k.is_in(self))
    }
}

/// Bitmask of [`TokenCategory`] tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenCategories(u16);

impl TokenCategories {
    pub fn of(categories: &[TokenCategory]) -> Self {
        Self(categories.iter().fold(0, |acc, c| acc | c.bit()))
    }

    pub const fn contains(self, category: TokenCategory) -> bool {
        self.0 & category.bit() != 0
    }
}

/// Fixed-size set of token kinds, used for FIRST sets and expected-token sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet([u64; 4]);

impl TokenSet {
    pub const CAPACITY: usize = 256;

    pub const fn empty() -> Self {
        Self([0; 4])
    }

    pub fn of_category(category: TokenCategory) -> Self {
        let mut set = Self::empty();
        for kind in category.members() {
            set.insert(kind);
        }
        set
    }

    pub fn insert(&mut self, kind: TokenKind) {
        let i = kind.index();
        self.0[i / 64] |= 1 << (i % 64);
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        let i = kind.index();
        self.0[i / 64] & (1 << (i % 64)) != 0
    }

    /// Adds every member of `other`; returns true if the set grew.
    pub fn union_with(&mut self, other: &TokenSet) -> bool {
        let mut grew = false;
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            let merged = *mine | *theirs;
            grew |= merged != *mine;
            *mine = merged;
        }
        grew
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        TokenKind::ALL.iter().copied().filter(|k| self.contains(*k))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(TokenKind::name)).finish()
    }
}

/// A lexed token. Offsets are byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub len: usize,
    /// Set on a quoted token whose closing delimiter is missing.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unterminated: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize) -> Self {
        let text = text.into();
        Self {
            kind,
            len: text.len(),
            text,
            start,
            unterminated: false,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end())
    }

    /// Identifier text with quoting removed, for name comparisons.
    pub fn unquoted(&self) -> String {
        if self.kind == TokenKind::QuotedIdentifier {
            let inner = self.text.strip_prefix('"').unwrap_or(&self.text);
            let inner = if self.unterminated {
                inner
            } else {
                inner.strip_suffix('"').unwrap_or(inner)
            };
            inner.replace("\"\"", "\"")
        } else {
            self.text.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(TokenKind::keyword("select"), Some(TokenKind::Select));
        assert_eq!(TokenKind::keyword("SeLeCt"), Some(TokenKind::Select));
        assert_eq!(TokenKind::keyword("skip_row"), Some(TokenKind::SkipRow));
        assert_eq!(TokenKind::keyword("selection"), None);
    }

    #[test]
    fn reserved_keywords_are_not_identifier_like() {
        for kind in TokenKind::ALL {
            if kind.is_reserved() {
                assert!(
                    !kind.is_in(TokenCategory::IdentifierLike),
                    "{kind:?} is reserved but identifier-like"
                );
            }
        }
    }

    #[test]
    fn non_reserved_keywords_are_identifier_like() {
        assert!(TokenKind::Timestamp.is_in(TokenCategory::IdentifierLike));
        assert!(TokenKind::Symbol.is_in(TokenCategory::IdentifierLike));
        assert!(TokenKind::Identifier.is_in(TokenCategory::IdentifierLike));
        assert!(!TokenKind::From.is_in(TokenCategory::IdentifierLike));
    }

    #[test]
    fn keyword_table_has_no_duplicates() {
        assert_eq!(KEYWORDS.len(), KEYWORD_TABLE.len());
    }

    #[test]
    fn operator_table_is_longest_first_for_shared_prefixes() {
        let ops = TokenKind::operators();
        for (i, (a, _)) in ops.iter().enumerate() {
            for (b, _) in &ops[i + 1..] {
                assert!(
                    !b.starts_with(a) || b.len() <= a.len(),
                    "{b} must precede {a}"
                );
            }
        }
    }

    #[test]
    fn token_set_membership() {
        let mut set = TokenSet::empty();
        assert!(set.is_empty());
        set.insert(TokenKind::Zone);
        set.insert(TokenKind::LParen);
        assert!(set.contains(TokenKind::Zone));
        assert!(!set.contains(TokenKind::Year));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![TokenKind::LParen, TokenKind::Zone]
        );

        let mut other = TokenSet::empty();
        other.insert(TokenKind::Zone);
        assert!(!set.union_with(&other));
        other.insert(TokenKind::Year);
        assert!(set.union_with(&other));
    }

    #[test]
    fn unquoted_strips_delimiters_and_escapes() {
        let token = Token::new(TokenKind::QuotedIdentifier, "\"my \"\"col\"\"\"", 0);
        assert_eq!(token.unquoted(), "my \"col\"");
    }
}
