//! Predicate language for row filtering
//!
//! A small boolean expression grammar over column names:
//!
//! ```text
//! price < 100 and region in ['north', 'east']
//! not (`unit cost` >= 2.5 | paid == False)
//! 1 < quantity <= 10
//! ```
//!
//! Parsing happens once per request and rejects malformed text up front.
//! Binding happens once per chunk, against that chunk's inferred column
//! types, and may fail for that chunk alone.

mod ast;
mod errors;
mod eval;
mod lexer;
mod parser;

pub use ast::{CompareOp, Expr};
pub use errors::{BindError, PredicateError, PredicateResult};
pub use eval::{bind, BoundPredicate, POSITION_COLUMN};
pub use lexer::{tokenize, Spanned, Token};
pub use parser::{parse, MAX_DEPTH};

use crate::dataset::{ColumnType, Schema, Value};

/// Text reported for the default predicate
pub const MATCH_ALL: &str = "True";

/// A parsed predicate and the text it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    text: String,
    expr: Expr,
}

impl Predicate {
    /// Parse predicate text
    pub fn parse(text: &str) -> PredicateResult<Self> {
        let expr = parser::parse(text)?;
        Ok(Self {
            text: text.to_string(),
            expr,
        })
    }

    /// Predicate that accepts every row
    pub fn match_all() -> Self {
        Self {
            text: MATCH_ALL.to_string(),
            expr: Expr::Literal(Value::Bool(true)),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Bind against one chunk's column types
    pub fn bind(&self, schema: &Schema, types: &[ColumnType]) -> Result<BoundPredicate, BindError> {
        eval::bind(&self.expr, schema, types)
    }
}
