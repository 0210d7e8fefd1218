//! Module `lexer` implements a one-pass scanner for Calyx source text.
//!
//! It transforms a source string into an owned `Vec<Token>`, skipping
//! whitespace and `//` comments, and appending exactly one `Eof` token at the
//! end. The scan is total: it either produces the whole token vector or fails
//! with an `UnrecognizedToken` error on the first character matching no rule.
//!
//! Position bookkeeping follows the language's diagnostic rules: lines and
//! columns are 1-based, a newline resets the column, a tab advances it by 4,
//! and every token records its absolute 0-based character offset.
//!
//! Two quirks of the language are preserved deliberately:
//!
//! - a `-` immediately followed by a digit folds into a single signed numeric
//!   literal (so `5-3` lexes as `5` and `-3`, two tokens, not three);
//! - an unterminated string literal consumes to end of input and still yields
//!   a `Str` token rather than an error.

use crate::error::{CalyxError, Result};
use crate::token::{SourceLocation, Token, TokenType};
use log::{debug, info};
use phf::phf_map;

// Static keyword map (compile-time perfect hash). Only `let`, `const` and
// `null` participate in the current grammar; the rest are reserved words.
static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "let"    => TokenType::Let,
    "const"  => TokenType::Const,
    "symbol" => TokenType::Symbol,
    "if"     => TokenType::If,
    "then"   => TokenType::Then,
    "else"   => TokenType::Else,
    "while"  => TokenType::While,
    "for"    => TokenType::For,
    "do"     => TokenType::Do,
    "func"   => TokenType::Func,
    "null"   => TokenType::Null,
};

/// A single-pass **lexer** that converts source text into a sequence of
/// [`Token`]s. One character of lookahead suffices everywhere except the
/// two-character forms `**` and `//`.
pub struct Lexer {
    chars: Vec<char>,
    curr: usize,   // index of the next unexamined character
    line: usize,   // 1-based line counter ('\n' increments)
    column: usize, // 1-based column counter (tab advances by 4)
    filename: Option<String>,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Create a new lexer over `source`. The optional `filename` is copied
    /// into every emitted location for diagnostics.
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        info!("Lexer created over {} characters", source.chars().count());

        Self {
            chars: source.chars().collect(),
            curr: 0,
            line: 1,
            column: 1,
            filename: filename.map(str::to_owned),
            tokens: Vec::new(),
        }
    }

    /// Consume the whole input and return the token vector, `Eof` included.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        let eof_at: SourceLocation = self.here();
        self.tokens.push(Token::new(TokenType::Eof, "", eof_at));

        info!("Lexing produced {} tokens", self.tokens.len());

        Ok(self.tokens)
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.chars.len()
    }

    /// Snapshot the current source position.
    fn here(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.curr, self.filename.clone())
    }

    /// Consume one character, keeping the line/column bookkeeping in step.
    /// Callers guard with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> char {
        let c: char = self.chars[self.curr];
        self.curr += 1;

        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => self.column += 4,
            _ => self.column += 1,
        }

        c
    }

    /// Peek at the current character without consuming it. Returns `'\0'`
    /// past the end to avoid branching at call sites.
    #[inline(always)]
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.curr]
        }
    }

    /// Conditionally consume a character **iff** it matches `expected`.
    #[inline(always)]
    fn match_char(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn push(&mut self, token_type: TokenType, value: impl Into<String>, at: SourceLocation) {
        let token: Token = Token::new(token_type, value, at);
        debug!("Scanned token {}", token);

        self.tokens.push(token);
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at the current position. Whitespace and
    /// comments are consumed without emitting a token.
    fn scan_token(&mut self) -> Result<()> {
        let start: SourceLocation = self.here();
        let c: char = self.advance();

        match c {
            // ── single-character structural tokens ────────────────────────
            '(' => self.push(TokenType::OpenParen, "(", start),
            ')' => self.push(TokenType::CloseParen, ")", start),
            '{' => self.push(TokenType::OpenBrace, "{", start),
            '}' => self.push(TokenType::CloseBrace, "}", start),
            '[' => self.push(TokenType::OpenBracket, "[", start),
            ']' => self.push(TokenType::CloseBracket, "]", start),

            // ── comments (// ... until newline) or division ───────────────
            '/' => {
                if self.match_char('/') {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                } else {
                    self.push(TokenType::BinaryOperator, "/", start);
                }
            }

            // ── a minus glued to digits folds into a signed literal ───────
            '-' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number(c, start);
                } else {
                    self.push(TokenType::BinaryOperator, "-", start);
                }
            }

            // ── remaining arithmetic operators, '**' included ─────────────
            '+' | '%' => self.push(TokenType::BinaryOperator, c, start),

            '*' => {
                if self.match_char('*') {
                    self.push(TokenType::BinaryOperator, "**", start);
                } else {
                    self.push(TokenType::BinaryOperator, "*", start);
                }
            }

            // ── single-character control tokens ───────────────────────────
            ';' => self.push(TokenType::Semicolon, ";", start),
            '=' => self.push(TokenType::Equals, "=", start),
            ',' => self.push(TokenType::Comma, ",", start),
            ':' => self.push(TokenType::Colon, ":", start),

            // '.' starts a decimal when digits follow, else it is member dot
            '.' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number(c, start);
                } else {
                    self.push(TokenType::Dot, ".", start);
                }
            }

            // ── string literal " ... " ────────────────────────────────────
            '"' => self.scan_string(start),

            // ── numeric literal (digit-leading) ───────────────────────────
            '0'..='9' => self.scan_number(c, start),

            // ── whitespace (bookkeeping happens in `advance`) ─────────────
            ' ' | '\t' | '\r' | '\n' => {}

            // ── identifiers / keywords ────────────────────────────────────
            _ if c.is_ascii_alphabetic() => self.scan_identifier(c, start),

            // ── unrecognized character ────────────────────────────────────
            _ => {
                return Err(CalyxError::unrecognized(c, start));
            }
        }

        Ok(())
    }

    /// Scan a double-quoted string literal, the opening quote already
    /// consumed. No escape sequences are processed. An unterminated string
    /// runs to end of input without error.
    fn scan_string(&mut self, start: SourceLocation) {
        let mut contents: String = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            contents.push(self.advance());
        }

        if self.is_at_end() {
            debug!("Unterminated string starting on line {}", start.line);
        } else {
            self.advance(); // consume closing quote
        }

        self.push(TokenType::Str, contents, start);
    }

    /// Scan a numeric literal. `first` is the already-consumed leading
    /// character: a digit, a folded `-` sign, or a leading `.`. At most one
    /// decimal point is absorbed; `.5` and `5.` are both legal.
    fn scan_number(&mut self, first: char, start: SourceLocation) {
        let mut text: String = String::new();
        text.push(first);

        let mut seen_dot: bool = first == '.';

        while self.peek().is_ascii_digit() {
            text.push(self.advance());
        }

        if !seen_dot && self.peek() == '.' {
            seen_dot = true;
            text.push(self.advance());

            while self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }

        let token_type: TokenType = if seen_dot {
            TokenType::Decimal
        } else {
            TokenType::Integer
        };

        self.push(token_type, text, start);
    }

    /// Scan an identifier (alphabetic characters only — the grammar admits no
    /// digits or underscores in names) and decide whether it is a keyword.
    fn scan_identifier(&mut self, first: char, start: SourceLocation) {
        let mut text: String = String::new();
        text.push(first);

        while self.peek().is_ascii_alphabetic() {
            text.push(self.advance());
        }

        let token_type: TokenType = KEYWORDS
            .get(text.as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);

        self.push(token_type, text, start);
    }
}

/// Convenience entry point: lex `source` in one call.
pub fn tokenize(source: &str, filename: Option<&str>) -> Result<Vec<Token>> {
    Lexer::new(source, filename).tokenize()
}
