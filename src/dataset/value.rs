//! Cell values and per-chunk column typing
//!
//! Columns are typed from the data of each chunk independently: a column is
//! numeric in a chunk when every non-null cell in that chunk parses as a
//! number. The same column may therefore be numeric in one chunk and text in
//! another, which is what makes predicate failures chunk-local.

use serde::{Serialize, Serializer};

/// Cell contents recognised as missing values
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "n/a", "NA", "NULL", "null", "NaN", "nan", "-NaN", "-nan",
    "None",
];

/// Inferred type of a column within one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    /// Also used for columns holding only nulls
    Float,
    Boolean,
    String,
}

impl ColumnType {
    /// Comparison family of the column
    pub fn kind(&self) -> ValueKind {
        match self {
            ColumnType::Integer | ColumnType::Float => ValueKind::Numeric,
            ColumnType::Boolean => ValueKind::Boolean,
            ColumnType::String => ValueKind::Text,
        }
    }
}

/// Comparison family of a value or operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Numeric,
    Boolean,
    Text,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Numeric => "number",
            ValueKind::Boolean => "bool",
            ValueKind::Text => "string",
        }
    }
}

/// Shared null for lookups past the end of a row
pub(crate) static NULL: Value = Value::Null;

/// A scalar cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Int(_) | Value::Float(_) => ValueKind::Numeric,
            Value::Str(_) => ValueKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Value::Float(_) => serializer.serialize_unit(),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

/// True when the raw cell denotes a missing value
pub fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

/// Infer the type of one column from its raw cells
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnType {
    let mut integer = true;
    let mut float = true;
    let mut boolean = true;
    let mut seen_value = false;

    for raw in cells {
        if is_na(raw) {
            continue;
        }
        seen_value = true;
        let trimmed = raw.trim();
        if integer && trimmed.parse::<i64>().is_err() {
            integer = false;
        }
        if float && trimmed.parse::<f64>().is_err() {
            float = false;
        }
        if boolean && parse_bool(trimmed).is_none() {
            boolean = false;
        }
        if !integer && !float && !boolean {
            return ColumnType::String;
        }
    }

    if !seen_value {
        ColumnType::Float
    } else if integer {
        ColumnType::Integer
    } else if float {
        ColumnType::Float
    } else if boolean {
        ColumnType::Boolean
    } else {
        ColumnType::String
    }
}

/// Convert a raw cell according to its column's inferred type
pub fn parse_cell(raw: &str, ty: ColumnType) -> Value {
    if is_na(raw) {
        return Value::Null;
    }
    let trimmed = raw.trim();
    match ty {
        ColumnType::Integer => trimmed.parse().map(Value::Int).unwrap_or(Value::Null),
        ColumnType::Float => trimmed.parse().map(Value::Float).unwrap_or(Value::Null),
        ColumnType::Boolean => parse_bool(trimmed).map(Value::Bool).unwrap_or(Value::Null),
        ColumnType::String => Value::Str(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens() {
        assert!(is_na(""));
        assert!(is_na("NaN"));
        assert!(is_na(" NULL "));
        assert!(!is_na("0"));
        assert!(!is_na("nothing"));
    }

    #[test]
    fn test_infer_integer() {
        assert_eq!(infer_column_type(["1", "2", "-3"]), ColumnType::Integer);
        assert_eq!(infer_column_type(["1", "", "3"]), ColumnType::Integer);
    }

    #[test]
    fn test_infer_float() {
        assert_eq!(infer_column_type(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_column_type(["", "NaN"]), ColumnType::Float);
    }

    #[test]
    fn test_infer_boolean() {
        assert_eq!(infer_column_type(["True", "false"]), ColumnType::Boolean);
    }

    #[test]
    fn test_infer_string() {
        assert_eq!(infer_column_type(["12", "twelve"]), ColumnType::String);
        assert_eq!(infer_column_type(["True", "1"]), ColumnType::String);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("42", ColumnType::Integer), Value::Int(42));
        assert_eq!(parse_cell(" 4.5 ", ColumnType::Float), Value::Float(4.5));
        assert_eq!(parse_cell("TRUE", ColumnType::Boolean), Value::Bool(true));
        assert_eq!(parse_cell("", ColumnType::String), Value::Null);
        assert_eq!(
            parse_cell(" Berlin", ColumnType::String),
            Value::Str(" Berlin".to_string())
        );
    }

    #[test]
    fn test_value_serialization() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::Float(f64::NAN),
            Value::Bool(false),
            Value::Null,
            Value::Str("a".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,2.5,null,false,null,"a"]"#);
    }
}
