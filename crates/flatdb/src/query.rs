//! Single-field record filters.
//!
//! A [`Query`] names a field, an [`Operator`] and a value. It is evaluated by a
//! full linear scan over the collection; there are no indexes. Records that
//! lack the field never match, and an empty field name matches nothing.

use crate::error::StoreError;
use crate::record::Record;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison applied between a record's field and the query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Deep structural equality (see [`values_equal`]).
    Eq,
    /// Field value orders after the query value.
    Gt,
    /// Field value orders before the query value.
    Lt,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Operator::Eq),
            "gt" => Ok(Operator::Gt),
            "lt" => Ok(Operator::Lt),
            other => Err(StoreError::InvalidQuery(format!(
                "unknown operator '{}' (expected eq, gt or lt)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Query {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.field.is_empty() {
            return false;
        }
        let Some(field_value) = record.get(&self.field) else {
            return false;
        };

        match self.operator {
            Operator::Eq => values_equal(field_value, &self.value),
            Operator::Gt => compare_values(field_value, &self.value) == Ordering::Greater,
            Operator::Lt => compare_values(field_value, &self.value) == Ordering::Less,
        }
    }
}

/// Structural equality over dynamic values.
///
/// Numbers compare by numeric value, so `1` and `1.0` are equal. Values of
/// different kinds are never equal.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

/// Orders two numbers numerically or two strings lexicographically.
///
/// Any other pairing, including mismatched kinds, reports `Equal`, which makes
/// both `gt` and `lt` reject it.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
