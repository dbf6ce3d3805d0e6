//! Per-chunk binding and row evaluation
//!
//! Binding resolves column names to positions and checks operand kinds
//! against the chunk's inferred column types. A bound predicate then
//! evaluates rows without further checks.
//!
//! Row semantics follow data-frame conventions: numbers compare numerically,
//! strings lexically, `false < true`; a null operand makes `==` and ordering
//! comparisons false and `!=` true; `==` across kinds is false.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::dataset::{ColumnType, Row, Schema, Value, ValueKind, NULL};

use super::ast::{CompareOp, Expr};
use super::errors::BindError;

/// Name resolving to the row position when no such column exists
pub const POSITION_COLUMN: &str = "index";

#[derive(Debug, Clone)]
enum Bound {
    Column { idx: usize, kind: ValueKind },
    Position,
    Literal(Value),
    List(Vec<Value>),
    Compare {
        op: CompareOp,
        lhs: Box<Bound>,
        rhs: Box<Bound>,
    },
    And(Vec<Bound>),
    Or(Vec<Bound>),
    Not(Box<Bound>),
}

impl Bound {
    fn kind(&self) -> ValueKind {
        match self {
            Bound::Column { kind, .. } => *kind,
            Bound::Position => ValueKind::Numeric,
            Bound::Literal(value) => value.kind(),
            // Lists never reach a kind check; the parser only places them after `in`.
            Bound::List(_) => ValueKind::Null,
            Bound::Compare { .. } | Bound::And(_) | Bound::Or(_) | Bound::Not(_) => {
                ValueKind::Boolean
            }
        }
    }

    fn value<'r>(&'r self, row: &'r Row) -> Cow<'r, Value> {
        match self {
            Bound::Column { idx, .. } => Cow::Borrowed(row.get(*idx).unwrap_or(&NULL)),
            Bound::Position => Cow::Owned(Value::Int(row.position() as i64)),
            Bound::Literal(value) => Cow::Borrowed(value),
            Bound::List(_) => Cow::Owned(Value::Null),
            _ => Cow::Owned(Value::Bool(self.test(row))),
        }
    }

    fn test(&self, row: &Row) -> bool {
        match self {
            Bound::Compare { op, lhs, rhs } => {
                let left = lhs.value(row);
                match (op, rhs.as_ref()) {
                    (CompareOp::In, Bound::List(items)) => {
                        items.iter().any(|item| values_equal(&left, item))
                    }
                    (CompareOp::NotIn, Bound::List(items)) => {
                        !items.iter().any(|item| values_equal(&left, item))
                    }
                    _ => compare(*op, &left, &rhs.value(row)),
                }
            }
            Bound::And(terms) => terms.iter().all(|term| term.test(row)),
            Bound::Or(terms) => terms.iter().any(|term| term.test(row)),
            Bound::Not(inner) => !inner.test(row),
            other => other.value(row).as_bool().unwrap_or(false),
        }
    }
}

/// A predicate bound to one chunk's column types
#[derive(Debug, Clone)]
pub struct BoundPredicate {
    root: Bound,
}

impl BoundPredicate {
    /// True when the row satisfies the predicate
    pub fn matches(&self, row: &Row) -> bool {
        self.root.test(row)
    }
}

/// Bind an expression against a schema and the column types of one chunk
pub fn bind(expr: &Expr, schema: &Schema, types: &[ColumnType]) -> Result<BoundPredicate, BindError> {
    let binder = Binder { schema, types };
    let root = binder.bind(expr)?;
    binder.require_boolean(&root, "predicate")?;
    Ok(BoundPredicate { root })
}

struct Binder<'a> {
    schema: &'a Schema,
    types: &'a [ColumnType],
}

impl Binder<'_> {
    fn bind(&self, expr: &Expr) -> Result<Bound, BindError> {
        Ok(match expr {
            Expr::Column(name) => self.column(name)?,
            Expr::Literal(value) => Bound::Literal(value.clone()),
            Expr::List(items) => Bound::List(items.clone()),
            Expr::Compare { op, lhs, rhs } => {
                let lhs = self.bind(lhs)?;
                let rhs = self.bind(rhs)?;
                if op.is_relational() {
                    check_orderable(*op, lhs.kind(), rhs.kind())?;
                }
                Bound::Compare {
                    op: *op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }
            }
            Expr::And(terms) => Bound::And(self.bind_terms(terms, "'and'")?),
            Expr::Or(terms) => Bound::Or(self.bind_terms(terms, "'or'")?),
            Expr::Not(inner) => {
                let inner = self.bind(inner)?;
                self.require_boolean(&inner, "'not'")?;
                Bound::Not(Box::new(inner))
            }
        })
    }

    fn bind_terms(&self, terms: &[Expr], context: &'static str) -> Result<Vec<Bound>, BindError> {
        terms
            .iter()
            .map(|term| {
                let bound = self.bind(term)?;
                self.require_boolean(&bound, context)?;
                Ok(bound)
            })
            .collect()
    }

    fn column(&self, name: &str) -> Result<Bound, BindError> {
        match self.schema.position(name) {
            Some(idx) => {
                let kind = self
                    .types
                    .get(idx)
                    .map(ColumnType::kind)
                    .unwrap_or(ValueKind::Null);
                Ok(Bound::Column { idx, kind })
            }
            None if name == POSITION_COLUMN => Ok(Bound::Position),
            None => Err(BindError::UnknownColumn(name.to_string())),
        }
    }

    fn require_boolean(&self, bound: &Bound, context: &'static str) -> Result<(), BindError> {
        match bound.kind() {
            ValueKind::Boolean => Ok(()),
            other => Err(BindError::NotBoolean {
                context,
                found: other.as_str(),
            }),
        }
    }
}

fn check_orderable(op: CompareOp, lhs: ValueKind, rhs: ValueKind) -> Result<(), BindError> {
    if lhs == rhs || lhs == ValueKind::Null || rhs == ValueKind::Null {
        Ok(())
    } else {
        Err(BindError::TypeMismatch {
            op: op.as_str(),
            lhs: lhs.as_str(),
            rhs: rhs.as_str(),
        })
    }
}

fn order(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    order(lhs, rhs) == Some(Ordering::Equal)
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> bool {
    match op {
        CompareOp::Eq => values_equal(lhs, rhs),
        CompareOp::Ne => !values_equal(lhs, rhs),
        CompareOp::Lt => order(lhs, rhs) == Some(Ordering::Less),
        CompareOp::Le => matches!(order(lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
        CompareOp::Gt => order(lhs, rhs) == Some(Ordering::Greater),
        CompareOp::Ge => matches!(order(lhs, rhs), Some(Ordering::Greater | Ordering::Equal)),
        // Membership against a non-list never survives parsing.
        CompareOp::In | CompareOp::NotIn => false,
    }
}
