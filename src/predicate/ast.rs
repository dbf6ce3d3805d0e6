//! Predicate expression tree

use crate::dataset::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        }
    }

    /// Ordering comparisons require operands of one kind
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge
        )
    }

    pub fn is_membership(&self) -> bool {
        matches!(self, CompareOp::In | CompareOp::NotIn)
    }
}

/// Predicate expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference; `index` falls back to the row position
    Column(String),
    Literal(Value),
    /// Literal list, only valid on the right of `in` / `not in`
    List(Vec<Value>),
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Conjunction of two or more terms; chains stay flat
    And(Vec<Expr>),
    /// Disjunction of two or more terms; chains stay flat
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Conjunction, merged into an existing `And` on either side
    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        let mut terms = match lhs {
            Expr::And(terms) => terms,
            other => vec![other],
        };
        match rhs {
            Expr::And(more) => terms.extend(more),
            other => terms.push(other),
        }
        Expr::And(terms)
    }

    /// Disjunction, merged into an existing `Or` on either side
    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        let mut terms = match lhs {
            Expr::Or(terms) => terms,
            other => vec![other],
        };
        match rhs {
            Expr::Or(more) => terms.extend(more),
            other => terms.push(other),
        }
        Expr::Or(terms)
    }

    pub fn not(inner: Expr) -> Self {
        Expr::Not(Box::new(inner))
    }

    /// Short description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Column(_) => "column",
            Expr::Literal(value) => value.kind().as_str(),
            Expr::List(_) => "list",
            Expr::Compare { .. } | Expr::And(_) | Expr::Or(_) | Expr::Not(_) => "bool",
        }
    }

    /// Whether the expression could evaluate to a boolean
    ///
    /// Column references are undecided until bound to a chunk.
    pub fn may_be_boolean(&self) -> bool {
        match self {
            Expr::Column(_) => true,
            Expr::Literal(value) => matches!(value, Value::Bool(_)),
            Expr::List(_) => false,
            Expr::Compare { .. } | Expr::And(_) | Expr::Or(_) | Expr::Not(_) => true,
        }
    }
}
