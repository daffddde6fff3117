use crate::error::EvaluationError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The current value of every field in a form, keyed by field id.
pub type FormValues = AHashMap<String, FieldValue>;

/// A dynamically typed field value.
///
/// Which variant a field holds depends on its `FieldType`: text-like inputs and
/// dates hold `Text`, numeric inputs and derived fields hold `Number`, checkbox
/// groups hold `List`. `Null` stands for "no value yet".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True for the values a `required` rule rejects: null, `""` and `[]`.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Loose truthiness: `false`, `0`, `NaN`, `""` and null are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Converts the value into a formula operand.
    ///
    /// Falsy values bind as `0` and `true` as `1`. Text must hold a finite
    /// number literal; anything else is rejected so the caller can fall back.
    pub fn to_operand(&self, field_id: &str) -> Result<f64, EvaluationError> {
        if !self.is_truthy() {
            return Ok(0.0);
        }
        match self {
            FieldValue::Bool(_) => Ok(1.0),
            FieldValue::Number(n) => Ok(*n),
            FieldValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| EvaluationError::NonNumericOperand {
                    field_id: field_id.to_string(),
                    found: self.clone(),
                }),
            other => Err(EvaluationError::NonNumericOperand {
                field_id: field_id.to_string(),
                found: other.clone(),
            }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", format_number(*n)),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(", ")),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

/// Renders whole numbers without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}
