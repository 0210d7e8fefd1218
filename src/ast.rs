//! AST node model: a closed set of tagged variants produced by the parser and
//! consumed read-only by the evaluator. Every node that can fail at
//! evaluation time carries the [`SourceLocation`] of the token it came from.

use serde::Serialize;

use crate::token::SourceLocation;

/// The root of a parsed source unit: an ordered list of statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A complete executable construct.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `('let'|'const') name ('=' initializer)? ';'` — a bare `let x;` binds
    /// null; a bare `const x;` is rejected by the parser.
    VarDecl {
        constant: bool,
        name: String,
        initializer: Option<Expr>,
        location: SourceLocation,
    },

    /// A stand-alone expression, optionally terminated by `;`.
    Expr(Expr),
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A whole-number literal. Both numeric literal kinds collapse into one
    /// runtime number type; the distinction is purely lexical.
    Integer {
        value: f64,
        location: SourceLocation,
    },

    /// A numeric literal that carried a decimal point.
    Decimal {
        value: f64,
        location: SourceLocation,
    },

    /// The `null` keyword.
    Null { location: SourceLocation },

    /// A variable reference, resolved against the scope chain at evaluation.
    Identifier {
        name: String,
        location: SourceLocation,
    },

    /// `left op right` with eager, left-before-right operand evaluation.
    Binary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },

    /// `target = value`, right-associative. The target is captured as-is;
    /// restricting it to an identifier happens at evaluation time.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
        location: SourceLocation,
    },

    /// `{ key, key: value, ... }`
    Object {
        properties: Vec<Property>,
        location: SourceLocation,
    },

    /// `caller(arg, ...)` — calls chain, so `f()()` parses.
    Call {
        caller: Box<Expr>,
        arguments: Vec<Expr>,
        location: SourceLocation,
    },

    /// `object.prop` (computed = false) or `object[expr]` (computed = true).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
        location: SourceLocation,
    },
}

/// One entry of an object literal. A missing value marks a shorthand
/// property, resolved by looking up a variable named after the key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: Option<Expr>,
    pub location: SourceLocation,
}

impl Expr {
    /// The source position this node was parsed at.
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Integer { location, .. }
            | Expr::Decimal { location, .. }
            | Expr::Null { location }
            | Expr::Identifier { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Object { location, .. }
            | Expr::Call { location, .. }
            | Expr::Member { location, .. } => location,
        }
    }
}

impl Stmt {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::VarDecl { location, .. } => location,
            Stmt::Expr(expr) => expr.location(),
        }
    }
}
