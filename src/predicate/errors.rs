//! Predicate error types
//!
//! `PredicateError` is a syntax error: the text never becomes an expression
//! and the request is rejected up front. `BindError` is structural and
//! chunk-local: the expression is valid but cannot be evaluated against one
//! chunk's column types.

use thiserror::Error;

/// Result type for predicate parsing
pub type PredicateResult<T> = Result<T, PredicateError>;

/// Syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unsupported operator '{op}' at offset {pos}")]
    UnsupportedOperator { op: String, pos: usize },

    #[error("unterminated string starting at offset {pos}")]
    UnterminatedString { pos: usize },

    #[error("invalid number '{text}' at offset {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unexpected {found} at offset {pos}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        pos: usize,
    },

    #[error("unexpected end of predicate, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("{context} must be a boolean expression, found {found}")]
    NotBoolean {
        context: &'static str,
        found: &'static str,
    },

    #[error("list at offset {pos} is only allowed after 'in' or 'not in'")]
    MisplacedList { pos: usize },

    #[error("predicate nests deeper than {max} levels at offset {pos}")]
    TooDeep { max: usize, pos: usize },
}

/// Chunk-local evaluation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("column '{0}' is not defined")]
    UnknownColumn(String),

    #[error("'{op}' not supported between {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("{context} requires a boolean operand, found {found}")]
    NotBoolean {
        context: &'static str,
        found: &'static str,
    },
}
