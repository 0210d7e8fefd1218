use log::info;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the Calyx lexer.
///
/// All variants are fieldless tags; a token's literal text lives in
/// [`Token::value`]. Keywords each get a dedicated variant so the parser
/// can reject reserved words without string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    /// '('
    OpenParen,

    /// ')'
    CloseParen,

    /// '{'
    OpenBrace,

    /// '}'
    CloseBrace,

    /// '['
    OpenBracket,

    /// ']'
    CloseBracket,

    /// One of '+', '-', '*', '**', '/', '%' — the operator text is in `value`
    BinaryOperator,

    /// ';'
    Semicolon,

    /// '='
    Equals,

    /// ','
    Comma,

    /// ':'
    Colon,

    /// '.'
    Dot,

    /// A whole-number literal (possibly lexer-folded sign, e.g. "-12")
    Integer,

    /// A numeric literal containing a decimal point
    Decimal,

    /// A double-quoted string literal (contents without quotes)
    Str,

    /// A user-defined name
    Identifier,

    /// 'let'
    Let,

    /// 'const'
    Const,

    /// 'symbol'
    Symbol,

    /// 'if'
    If,

    /// 'then'
    Then,

    /// 'else'
    Else,

    /// 'while'
    While,

    /// 'for'
    For,

    /// 'do'
    Do,

    /// 'func'
    Func,

    /// 'null'
    Null,

    /// End-of-input marker, always the last token of a stream
    Eof,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where a token (or an error) came from in the original source.
///
/// Lines and columns are 1-based; `position` is the absolute 0-based
/// character offset. A tab advances the column by 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub position: usize,
    pub filename: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, position: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            position,
            filename,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file: &str = self.filename.as_deref().unwrap_or("<source>");

        write!(f, "[{}:{}:{}]", file, self.line, self.column)
    }
}

/// A classified lexical unit: its kind, its literal text, and where it
/// was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact text that produced this token (quotes stripped for `Str`,
    /// sign folded in for negative numeric literals).
    pub value: String,

    /// Source position of the token's first character.
    pub location: SourceLocation,
}

impl Token {
    /// Create a new Token with the given type, text, and location.
    pub fn new(token_type: TokenType, value: impl Into<String>, location: SourceLocation) -> Self {
        let value: String = value.into();

        info!(
            "Creating new token: type={:?}, value={}, line={}",
            token_type, value, location.line
        );

        Self {
            token_type,
            value,
            location,
        }
    }

    /// Does this token mark the end of the stream?
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.token_type, self.value, self.location)
    }
}
