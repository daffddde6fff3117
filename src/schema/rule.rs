use super::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of constraint a `ValidationRule` enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Email,
    Password,
}

impl RuleKind {
    /// The message a freshly added rule of this kind starts with.
    pub fn default_message(self) -> &'static str {
        match self {
            RuleKind::Required => "This field is required",
            RuleKind::MinLength => "Minimum length not met",
            RuleKind::MaxLength => "Maximum length exceeded",
            RuleKind::Email => "Please enter a valid email address",
            RuleKind::Password => "Password must be at least 8 characters with one number",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Email => "email",
            RuleKind::Password => "password",
        };
        write!(f, "{}", name)
    }
}

/// The parameter attached to a rule: a flag for `required`, a length for
/// `minLength`/`maxLength`, unused otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleParam {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl RuleParam {
    pub fn is_truthy(&self) -> bool {
        match self {
            RuleParam::Flag(b) => *b,
            RuleParam::Number(n) => *n != 0.0 && !n.is_nan(),
            RuleParam::Text(s) => !s.is_empty(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleParam::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// One constraint on a field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleParam>,
    pub message: String,
}

impl ValidationRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Required,
            value: Some(RuleParam::Flag(true)),
            message: message.into(),
        }
    }

    pub fn min_length(length: usize, message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::MinLength,
            value: Some(RuleParam::Number(length as f64)),
            message: message.into(),
        }
    }

    pub fn max_length(length: usize, message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::MaxLength,
            value: Some(RuleParam::Number(length as f64)),
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Email,
            value: Some(RuleParam::Flag(true)),
            message: message.into(),
        }
    }

    pub fn password(message: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::Password,
            value: Some(RuleParam::Flag(true)),
            message: message.into(),
        }
    }

    /// A rule of the given kind with its default parameter and message.
    /// Length rules start at 1.
    pub fn default_for(kind: RuleKind) -> Self {
        let message = kind.default_message();
        match kind {
            RuleKind::Required => Self::required(message),
            RuleKind::MinLength => Self::min_length(1, message),
            RuleKind::MaxLength => Self::max_length(1, message),
            RuleKind::Email => Self::email(message),
            RuleKind::Password => Self::password(message),
        }
    }
}

/// The rules a new field of the given type is offered by default.
pub fn default_rules_for(field_type: FieldType) -> Vec<ValidationRule> {
    let message = match field_type {
        FieldType::Select | FieldType::Radio => "Please select an option",
        FieldType::Checkbox => "Please select at least one option",
        _ => "This field is required",
    };
    vec![ValidationRule::required(message)]
}
