//! Centralised error hierarchy for the **Calyx front end**.
//!
//! All subsystems (lexer, parser, evaluator, CLI) convert their failure modes
//! into one of the variants defined here, which enables a uniform `Result<T>`
//! alias throughout the crate and ergonomic inter-operation with `anyhow`.
//! Every language-level variant carries a full [`SourceLocation`]; the
//! location is part of the public error shape, not an optional extra.
//!
//! The module does not print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::{SourceLocation, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CalyxError {
    /// The lexer met a character matching no rule.
    #[error("{location} Unrecognized token '{character}'")]
    UnrecognizedToken {
        /// The offending character.
        character: char,

        /// Where it was found.
        location: SourceLocation,
    },

    /// The parser's primary-expression rule found no match for the current
    /// token.
    #[error("{location} Unexpected token {token_type} '{value}'")]
    UnexpectedToken {
        token_type: TokenType,
        value: String,
        location: SourceLocation,
    },

    /// A grammar expectation failed at a specific point (missing semicolon,
    /// unclosed bracket, uninitialized constant, ...).
    #[error("{location} Parse error: {message}")]
    Parse {
        message: String,
        location: SourceLocation,
    },

    /// Evaluator-level failure: undefined variable, redeclaration, assignment
    /// to a constant, calling a non-callable, and the like.
    #[error("{location} Exception: {message}")]
    Exception {
        message: String,
        location: SourceLocation,
    },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF-8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl CalyxError {
    /// Helper constructor for the **lexer**.
    pub fn unrecognized(character: char, location: SourceLocation) -> Self {
        info!(
            "Creating UnrecognizedToken error: char={:?}, line={}",
            character, location.line
        );

        CalyxError::UnrecognizedToken {
            character,
            location,
        }
    }

    /// Helper constructor for the **parser**'s primary rule.
    pub fn unexpected(token_type: TokenType, value: impl Into<String>, location: SourceLocation) -> Self {
        let value: String = value.into();

        info!(
            "Creating UnexpectedToken error: type={:?}, value={}, line={}",
            token_type, value, location.line
        );

        CalyxError::UnexpectedToken {
            token_type,
            value,
            location,
        }
    }

    /// Helper constructor for **grammar expectation** failures.
    pub fn parse<S: Into<String>>(msg: S, location: SourceLocation) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Parse error: line={}, msg={}",
            location.line, message
        );

        CalyxError::Parse { message, location }
    }

    /// Helper constructor for the **evaluator**.
    pub fn exception<S: Into<String>>(msg: S, location: SourceLocation) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Exception: line={}, msg={}",
            location.line, message
        );

        CalyxError::Exception { message, location }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CalyxError>;
