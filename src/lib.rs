//! Calyx language front end: lexer, recursive-descent parser and
//! tree-walking evaluator over a shared error and value model.

pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;
