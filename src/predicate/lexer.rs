//! Predicate tokenizer

use std::fmt;

use crate::dataset::Value;

use super::errors::{PredicateError, PredicateResult};

/// Predicate tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier (column name)
    Ident(String),
    /// Back-ticked column name
    Quoted(String),
    /// Number, string, boolean or null literal
    Literal(Value),
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    In,
    Minus,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Quoted(name) => write!(f, "column `{}`", name),
            Token::Literal(value) => write!(f, "literal {:?}", value),
            Token::EqEq => write!(f, "'=='"),
            Token::NotEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Le => write!(f, "'<='"),
            Token::Gt => write!(f, "'>'"),
            Token::Ge => write!(f, "'>='"),
            Token::And => write!(f, "'and'"),
            Token::Or => write!(f, "'or'"),
            Token::Not => write!(f, "'not'"),
            Token::In => write!(f, "'in'"),
            Token::Minus => write!(f, "'-'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
        }
    }
}

/// A token and its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Split predicate text into tokens
pub fn tokenize(src: &str) -> PredicateResult<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match ch {
            '(' | ')' | '[' | ']' | ',' | '~' | '-' => {
                chars.next();
                match ch {
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    ',' => Token::Comma,
                    '~' => Token::Not,
                    _ => Token::Minus,
                }
            }
            '=' | '!' | '<' | '>' | '&' | '|' => {
                chars.next();
                let next = chars.peek().map(|&(_, c)| c);
                let (token, doubled) = match (ch, next) {
                    ('=', Some('=')) => (Token::EqEq, true),
                    ('=', _) => {
                        return Err(PredicateError::UnsupportedOperator {
                            op: "=".into(),
                            pos,
                        })
                    }
                    ('!', Some('=')) => (Token::NotEq, true),
                    ('!', _) => (Token::Not, false),
                    ('<', Some('=')) => (Token::Le, true),
                    ('<', _) => (Token::Lt, false),
                    ('>', Some('=')) => (Token::Ge, true),
                    ('>', _) => (Token::Gt, false),
                    ('&', Some('&')) => (Token::And, true),
                    ('&', _) => (Token::And, false),
                    ('|', Some('|')) => (Token::Or, true),
                    _ => (Token::Or, false),
                };
                if doubled {
                    chars.next();
                }
                token
            }
            '\'' | '"' => {
                chars.next();
                Token::Literal(Value::Str(read_quoted(&mut chars, ch, pos)?))
            }
            '`' => {
                chars.next();
                Token::Quoted(read_quoted(&mut chars, '`', pos)?)
            }
            c if c.is_ascii_digit() || c == '.' => read_number(src, &mut chars, pos)?,
            c if c.is_alphabetic() || c == '_' => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                keyword_or_ident(&src[pos..end])
            }
            '+' | '*' | '/' | '%' | '^' | '@' => {
                return Err(PredicateError::UnsupportedOperator {
                    op: ch.to_string(),
                    pos,
                })
            }
            _ => return Err(PredicateError::UnexpectedChar { ch, pos }),
        };

        tokens.push(Spanned { token, pos });
    }

    Ok(tokens)
}

fn keyword_or_ident(word: &str) -> Token {
    match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "in" => Token::In,
        "True" | "true" => Token::Literal(Value::Bool(true)),
        "False" | "false" => Token::Literal(Value::Bool(false)),
        "None" | "null" => Token::Literal(Value::Null),
        _ => Token::Ident(word.to_string()),
    }
}

fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> PredicateResult<String> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' if quote != '`' => match chars.next() {
                Some((_, escaped)) => out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                }),
                None => break,
            },
            c if c == quote => return Ok(out),
            c => out.push(c),
        }
    }
    Err(PredicateError::UnterminatedString { pos: start })
}

fn read_number(
    src: &str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
) -> PredicateResult<Token> {
    let mut end = start;
    let mut prev = '\0';
    while let Some(&(i, c)) = chars.peek() {
        let exponent_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
        if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
            end = i + c.len_utf8();
            prev = c;
            chars.next();
        } else {
            break;
        }
    }

    let text = &src[start..end];
    let digits = text.replace('_', "");
    if let Ok(i) = digits.parse::<i64>() {
        return Ok(Token::Literal(Value::Int(i)));
    }
    match digits.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(Token::Literal(Value::Float(f))),
        _ => Err(PredicateError::InvalidNumber {
            text: text.to_string(),
            pos: start,
        }),
    }
}
