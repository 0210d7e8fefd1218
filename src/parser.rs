/*!
Recursive-descent parser for Calyx.

Grammar (highest to lowest precedence, composed top-down):

```text
program        → statement* EOF ;
statement      → declaration | expression ";"? ;
declaration    → ( "let" | "const" ) IDENT ( "=" expression )? ";" ;
expression     → assignment ;
assignment     → objectOrAdditive ( "=" assignment )? ;
objectOrAdditive → objectLiteral | additive ;
objectLiteral  → "{" ( IDENT ( ":" expression )? ","? )* "}" ;
additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
multiplicative → power ( ( "*" | "/" | "%" ) power )* ;
power          → callMember ( "**" callMember )* ;
callMember     → member ( "(" arguments? ")" )* ;
member         → primary ( ( "." IDENT ) | ( "[" expression "]" ) )* ;
arguments      → assignment ( "," assignment )* ;
primary        → IDENT | INTEGER | DECIMAL | "(" expression ")" | "null" ;
```

Assignment is right-associative and its target is captured as-is; the
identifier-only restriction is enforced at evaluation time. `**` folds its
right operand before the surrounding `* / %` chain combines, so
`2 * 3 ** 2` evaluates to 18. A bare `let x;` is legal (implicit null), a
bare `const x;` is rejected.

Parsing halts at the first structural violation — there is no error
recovery and no partial result.
*/

use crate::ast::{Expr, Program, Property, Stmt};
use crate::error::{CalyxError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Top-level parser over an immutable slice of tokens.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser. The slice must end with an `Eof` token, which
    /// the lexer guarantees.
    pub fn new(tokens: &'a [Token]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self { tokens, current: 0 }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.
    pub fn parse(&mut self) -> Result<Program> {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        Ok(Program { statements })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement");

        if self.check(TokenType::Let) || self.check(TokenType::Const) {
            return self.var_declaration();
        }

        let expr: Expr = self.expression()?;

        // Expression statements tolerate an optional terminator.
        self.matches(TokenType::Semicolon);

        Ok(Stmt::Expr(expr))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let keyword: Token = self.advance().clone();
        let constant: bool = keyword.token_type == TokenType::Const;

        let name: String = self
            .consume(TokenType::Identifier, "Expected variable name")?
            .value
            .clone();

        let initializer: Option<Expr> = if self.matches(TokenType::Equals) {
            Some(self.expression()?)
        } else {
            None
        };

        if constant && initializer.is_none() {
            return Err(CalyxError::parse(
                format!("Constant '{}' must be initialized", name),
                keyword.location,
            ));
        }

        self.consume(
            TokenType::Semicolon,
            "Expected ';' after variable declaration",
        )?;

        Ok(Stmt::VarDecl {
            constant,
            name,
            initializer,
            location: keyword.location,
        })
    }

    // ───────────────────────── expression rules ───────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr: Expr = self.object_or_additive()?;

        if self.check(TokenType::Equals) {
            let equals: Token = self.advance().clone();
            let value: Expr = self.assignment()?;

            return Ok(Expr::Assign {
                target: Box::new(expr),
                value: Box::new(value),
                location: equals.location,
            });
        }

        Ok(expr)
    }

    /// An opening brace at expression level always starts an object literal;
    /// anything else descends into arithmetic.
    fn object_or_additive(&mut self) -> Result<Expr> {
        if self.check(TokenType::OpenBrace) {
            self.object_literal()
        } else {
            self.additive()
        }
    }

    fn object_literal(&mut self) -> Result<Expr> {
        let open: Token = self.advance().clone();
        debug!("Entering object literal on line {}", open.location.line);

        let mut properties: Vec<Property> = Vec::new();

        while !self.check(TokenType::CloseBrace) && !self.is_at_end() {
            let key_token: Token = self
                .consume(TokenType::Identifier, "Expected property key")?
                .clone();

            // `key: value` or shorthand `key` alone.
            let value: Option<Expr> = if self.matches(TokenType::Colon) {
                Some(self.expression()?)
            } else {
                None
            };

            properties.push(Property {
                key: key_token.value,
                value,
                location: key_token.location,
            });

            if !self.check(TokenType::CloseBrace) {
                self.consume(TokenType::Comma, "Expected ',' or '}' after property")?;
            }
        }

        self.consume(TokenType::CloseBrace, "Expected '}' after object literal")?;

        Ok(Expr::Object {
            properties,
            location: open.location,
        })
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.multiplicative()?;

        while let Some(operator) = self.match_operator(&["+", "-"]) {
            let right: Expr = self.multiplicative()?;

            expr = Expr::Binary {
                operator: operator.value,
                left: Box::new(expr),
                right: Box::new(right),
                location: operator.location,
            };
        }

        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.power()?;

        while let Some(operator) = self.match_operator(&["*", "/", "%"]) {
            let right: Expr = self.power()?;

            expr = Expr::Binary {
                operator: operator.value,
                left: Box::new(expr),
                right: Box::new(right),
                location: operator.location,
            };
        }

        Ok(expr)
    }

    /// `**` binds tighter than the rest of the multiplicative tier, so
    /// `2 * 3 ** 2` groups as `2 * (3 ** 2)`. Chains fold left to right.
    fn power(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.call_member()?;

        while let Some(operator) = self.match_operator(&["**"]) {
            let right: Expr = self.call_member()?;

            expr = Expr::Binary {
                operator: operator.value,
                left: Box::new(expr),
                right: Box::new(right),
                location: operator.location,
            };
        }

        Ok(expr)
    }

    fn call_member(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.member()?;

        while self.check(TokenType::OpenParen) {
            let paren: Token = self.advance().clone();
            let arguments: Vec<Expr> = self.arguments()?;

            expr = Expr::Call {
                caller: Box::new(expr),
                arguments,
                location: paren.location,
            };
        }

        Ok(expr)
    }

    /// Zero or more comma-separated assignment expressions, the opening
    /// parenthesis already consumed.
    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(TokenType::CloseParen) {
            loop {
                arguments.push(self.assignment()?);

                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::CloseParen, "Expected ')' after arguments")?;

        Ok(arguments)
    }

    fn member(&mut self) -> Result<Expr> {
        let mut expr: Expr = self.primary()?;

        loop {
            if self.check(TokenType::Dot) {
                let dot: Token = self.advance().clone();
                let name: Token = self
                    .consume(TokenType::Identifier, "Expected property name after '.'")?
                    .clone();

                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(Expr::Identifier {
                        name: name.value,
                        location: name.location,
                    }),
                    computed: false,
                    location: dot.location,
                };
            } else if self.check(TokenType::OpenBracket) {
                let bracket: Token = self.advance().clone();
                let property: Expr = self.expression()?;

                self.consume(TokenType::CloseBracket, "Expected ']' after member index")?;

                expr = Expr::Member {
                    object: Box::new(expr),
                    property: Box::new(property),
                    computed: true,
                    location: bracket.location,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr> {
        let token: Token = self.peek().clone();

        match token.token_type {
            TokenType::Identifier => {
                self.advance();

                Ok(Expr::Identifier {
                    name: token.value,
                    location: token.location,
                })
            }

            TokenType::Integer => {
                self.advance();

                let value: f64 = parse_numeric(&token)?;

                Ok(Expr::Integer {
                    value,
                    location: token.location,
                })
            }

            TokenType::Decimal => {
                self.advance();

                let value: f64 = parse_numeric(&token)?;

                Ok(Expr::Decimal {
                    value,
                    location: token.location,
                })
            }

            TokenType::Null => {
                self.advance();

                Ok(Expr::Null {
                    location: token.location,
                })
            }

            TokenType::OpenParen => {
                self.advance();

                let expr: Expr = self.expression()?;

                self.consume(TokenType::CloseParen, "Expected ')' after expression")?;

                // A parenthesized expression is just its inner node.
                Ok(expr)
            }

            _ => Err(CalyxError::unexpected(
                token.token_type,
                token.value,
                token.location,
            )),
        }
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    /// Consume the current token when it is a `BinaryOperator` whose text is
    /// one of `ops`.
    fn match_operator(&mut self, ops: &[&str]) -> Option<Token> {
        let token: &Token = self.peek();

        if token.token_type == TokenType::BinaryOperator && ops.contains(&token.value.as_str()) {
            return Some(self.advance().clone());
        }

        None
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&Token> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(CalyxError::parse(message, self.peek().location.clone()))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }

        &self.tokens[self.current - 1]
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    #[inline(always)]
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }
}

fn parse_numeric(token: &Token) -> Result<f64> {
    token.value.parse::<f64>().map_err(|_| {
        CalyxError::parse(
            format!("Invalid numeric literal '{}'", token.value),
            token.location.clone(),
        )
    })
}

/// Convenience entry point: parse a token slice in one call.
pub fn parse(tokens: &[Token]) -> Result<Program> {
    Parser::new(tokens).parse()
}
