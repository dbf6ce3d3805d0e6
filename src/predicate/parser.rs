//! Recursive-descent predicate parser
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparison. Comparisons
//! chain: `a < b <= c` means `a < b and b <= c`.
//!
//! Connective chains are built flat, so only parentheses and `not` add
//! depth. Both are capped at `MAX_DEPTH` levels.

use crate::dataset::Value;

use super::ast::{CompareOp, Expr};
use super::errors::{PredicateError, PredicateResult};
use super::lexer::{tokenize, Spanned, Token};

/// Deepest nesting of parentheses and `not` accepted
pub const MAX_DEPTH: usize = 64;

/// Parse predicate text into an expression
pub fn parse(src: &str) -> PredicateResult<Expr> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(PredicateError::UnexpectedEnd {
            expected: "expression",
        });
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(extra) = parser.peek() {
        return Err(PredicateError::UnexpectedToken {
            found: extra.token.to_string(),
            expected: "end of predicate",
            pos: extra.pos,
        });
    }

    require_boolean(&expr, "predicate")?;
    Ok(expr)
}

fn require_boolean(expr: &Expr, context: &'static str) -> PredicateResult<()> {
    if expr.may_be_boolean() {
        Ok(())
    } else {
        Err(PredicateError::NotBoolean {
            context,
            found: expr.describe(),
        })
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek_token(0) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> PredicateResult<()> {
        match self.advance() {
            Some(s) if &s.token == token => Ok(()),
            Some(s) => Err(PredicateError::UnexpectedToken {
                found: s.token.to_string(),
                expected,
                pos: s.pos,
            }),
            None => Err(PredicateError::UnexpectedEnd { expected }),
        }
    }

    fn enter(&mut self, pos: usize) -> PredicateResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PredicateError::TooDeep {
                max: MAX_DEPTH,
                pos,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> PredicateResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::Or) {
            let rhs = self.parse_and()?;
            require_boolean(&lhs, "operand of 'or'")?;
            require_boolean(&rhs, "operand of 'or'")?;
            lhs = Expr::or(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PredicateResult<Expr> {
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            let rhs = self.parse_not()?;
            require_boolean(&lhs, "operand of 'and'")?;
            require_boolean(&rhs, "operand of 'and'")?;
            lhs = Expr::and(lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> PredicateResult<Expr> {
        let not_pos = match self.peek() {
            Some(s) if s.token == Token::Not => Some(s.pos),
            _ => None,
        };
        let Some(not_pos) = not_pos else {
            return self.parse_compare();
        };
        self.pos += 1;

        self.enter(not_pos)?;
        let inner = self.parse_not()?;
        self.leave();
        require_boolean(&inner, "operand of 'not'")?;
        Ok(Expr::not(inner))
    }

    fn compare_op(&mut self) -> Option<CompareOp> {
        let current = self.peek_token(0)?.clone();
        let op = match current {
            Token::EqEq => CompareOp::Eq,
            Token::NotEq => CompareOp::Ne,
            Token::Lt => CompareOp::Lt,
            Token::Le => CompareOp::Le,
            Token::Gt => CompareOp::Gt,
            Token::Ge => CompareOp::Ge,
            Token::In => CompareOp::In,
            Token::Not if self.peek_token(1) == Some(&Token::In) => {
                self.pos += 1;
                CompareOp::NotIn
            }
            _ => return None,
        };
        self.pos += 1;
        Some(op)
    }

    fn parse_compare(&mut self) -> PredicateResult<Expr> {
        let mut operands = vec![self.parse_operand()?];
        let mut ops = Vec::new();

        while let Some(op) = self.compare_op() {
            let (rhs, pos) = self.parse_operand()?;
            if op.is_membership() && !matches!(rhs, Expr::List(_)) {
                return Err(PredicateError::UnexpectedToken {
                    found: rhs.describe().to_string(),
                    expected: "a list after 'in'",
                    pos,
                });
            }
            ops.push(op);
            operands.push((rhs, pos));
        }

        // A list may only close a membership test.
        for (idx, (operand, pos)) in operands.iter().enumerate() {
            if matches!(operand, Expr::List(_)) {
                let closes_membership =
                    idx > 0 && idx == ops.len() && ops[idx - 1].is_membership();
                if !closes_membership {
                    return Err(PredicateError::MisplacedList { pos: *pos });
                }
            }
        }

        if ops.is_empty() {
            let (expr, _) = operands.swap_remove(0);
            return Ok(expr);
        }

        let mut chain: Option<Expr> = None;
        for (k, op) in ops.iter().enumerate() {
            let link = Expr::compare(*op, operands[k].0.clone(), operands[k + 1].0.clone());
            chain = Some(match chain {
                Some(prev) => Expr::and(prev, link),
                None => link,
            });
        }
        Ok(chain.unwrap_or(Expr::Literal(Value::Null)))
    }

    fn parse_operand(&mut self) -> PredicateResult<(Expr, usize)> {
        let Some(Spanned { token, pos }) = self.advance() else {
            return Err(PredicateError::UnexpectedEnd { expected: "operand" });
        };

        let expr = match token {
            Token::Ident(name) | Token::Quoted(name) => Expr::Column(name),
            Token::Literal(value) => Expr::Literal(value),
            Token::Minus => Expr::Literal(self.negated_number(pos)?),
            Token::LParen => {
                self.enter(pos)?;
                let inner = self.parse_or()?;
                self.expect(&Token::RParen, "')'")?;
                self.leave();
                inner
            }
            Token::LBracket => Expr::List(self.parse_list()?),
            other => {
                return Err(PredicateError::UnexpectedToken {
                    found: other.to_string(),
                    expected: "operand",
                    pos,
                })
            }
        };
        Ok((expr, pos))
    }

    fn negated_number(&mut self, minus_pos: usize) -> PredicateResult<Value> {
        match self.advance() {
            Some(Spanned {
                token: Token::Literal(Value::Int(i)),
                ..
            }) => Ok(Value::Int(-i)),
            Some(Spanned {
                token: Token::Literal(Value::Float(f)),
                ..
            }) => Ok(Value::Float(-f)),
            Some(s) => Err(PredicateError::UnexpectedToken {
                found: s.token.to_string(),
                expected: "number after '-'",
                pos: s.pos,
            }),
            None => Err(PredicateError::UnsupportedOperator {
                op: "-".into(),
                pos: minus_pos,
            }),
        }
    }

    fn parse_list(&mut self) -> PredicateResult<Vec<Value>> {
        let mut items = Vec::new();
        if self.eat(&Token::RBracket) {
            return Ok(items);
        }
        loop {
            match self.advance() {
                Some(Spanned {
                    token: Token::Literal(value),
                    ..
                }) => items.push(value),
                Some(Spanned {
                    token: Token::Minus,
                    pos,
                }) => items.push(self.negated_number(pos)?),
                Some(s) => {
                    return Err(PredicateError::UnexpectedToken {
                        found: s.token.to_string(),
                        expected: "literal in list",
                        pos: s.pos,
                    })
                }
                None => return Err(PredicateError::UnexpectedEnd { expected: "']'" }),
            }
            if self.eat(&Token::RBracket) {
                return Ok(items);
            }
            self.expect(&Token::Comma, "',' or ']'")?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str) -> Expr {
        Expr::Column(name.to_string())
    }

    fn int(i: i64) -> Expr {
        Expr::Literal(Value::Int(i))
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            parse("price < 100").unwrap(),
            Expr::compare(CompareOp::Lt, col("price"), int(100))
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse("a == 1 or b == 2 and c == 3").unwrap();
        assert_eq!(
            expr,
            Expr::or(
                Expr::compare(CompareOp::Eq, col("a"), int(1)),
                Expr::and(
                    Expr::compare(CompareOp::Eq, col("b"), int(2)),
                    Expr::compare(CompareOp::Eq, col("c"), int(3)),
                )
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = parse("(a == 1 | b == 2) & c == 3").unwrap();
        assert!(matches!(expr, Expr::And(..)));
    }

    #[test]
    fn test_chained_comparison() {
        assert_eq!(
            parse("1 < price <= 10").unwrap(),
            Expr::and(
                Expr::compare(CompareOp::Lt, int(1), col("price")),
                Expr::compare(CompareOp::Le, col("price"), int(10)),
            )
        );
    }

    #[test]
    fn test_membership() {
        assert_eq!(
            parse("region not in ['north', 'east']").unwrap(),
            Expr::compare(
                CompareOp::NotIn,
                col("region"),
                Expr::List(vec![Value::Str("north".into()), Value::Str("east".into())])
            )
        );
    }

    #[test]
    fn test_negative_literal() {
        assert_eq!(
            parse("delta > -5").unwrap(),
            Expr::compare(CompareOp::Gt, col("delta"), int(-5))
        );
    }

    #[test]
    fn test_not_prefix() {
        assert_eq!(
            parse("not active").unwrap(),
            Expr::not(col("active"))
        );
    }

    #[test]
    fn test_literal_root_rejected() {
        assert!(matches!(
            parse("42"),
            Err(PredicateError::NotBoolean { .. })
        ));
        assert!(parse("True").is_ok());
    }

    #[test]
    fn test_list_outside_membership_rejected() {
        assert!(matches!(
            parse("[1, 2] == a"),
            Err(PredicateError::MisplacedList { .. })
        ));
        assert!(matches!(
            parse("a in 3"),
            Err(PredicateError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_incomplete_expressions() {
        assert!(matches!(parse("price <"), Err(PredicateError::UnexpectedEnd { .. })));
        assert!(matches!(parse("(a == 1"), Err(PredicateError::UnexpectedEnd { .. })));
        assert!(matches!(
            parse("a == 1 b"),
            Err(PredicateError::UnexpectedToken { .. })
        ));
        assert!(parse("").is_err());
    }

    #[test]
    fn test_non_boolean_connective_operand() {
        assert!(matches!(
            parse("a == 1 and 'x'"),
            Err(PredicateError::NotBoolean { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let at_limit = format!("{}a == 1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let too_deep = format!("{}a == 1{}", "(".repeat(5_000), ")".repeat(5_000));
        assert!(matches!(
            parse(&too_deep),
            Err(PredicateError::TooDeep { max: MAX_DEPTH, .. })
        ));

        let nots = format!("{}paid", "not ".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&nots), Err(PredicateError::TooDeep { .. })));
    }

    #[test]
    fn test_long_conjunction_is_flat() {
        let chain = vec!["price > 0"; 10_000].join(" and ");
        match parse(&chain).unwrap() {
            Expr::And(terms) => assert_eq!(terms.len(), 10_000),
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_sibling_parentheses_do_not_accumulate_depth() {
        let siblings = vec!["(a == 1)"; MAX_DEPTH * 2].join(" or ");
        assert!(parse(&siblings).is_ok());
    }
}
