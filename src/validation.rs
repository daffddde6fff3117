//! Rule-based validation of field values.

use crate::ast::{FieldValue, FormValues};
use crate::schema::{Field, RuleKind, ValidationRule};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORD_MISSING_DIGIT: &str = "Password must contain at least one number";

const PASSWORD_MIN_CHARS: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid e-mail pattern"));

/// A validation message attributed to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field_id: String,
    pub message: String,
}

/// Checks one field's value against its rules and returns the failure
/// messages in rule order.
///
/// Derived fields are never validated. The `password` rule reports its two
/// fixed diagnostics instead of the rule's configured message.
pub fn validate_field(field: &Field, value: Option<&FieldValue>, _all_values: &FormValues) -> Vec<String> {
    if field.is_derived() {
        return Vec::new();
    }

    let value = value.unwrap_or(&FieldValue::Null);
    let mut errors = Vec::new();
    for rule in &field.validation {
        check_rule(rule, value, &mut errors);
    }
    errors
}

fn check_rule(rule: &ValidationRule, value: &FieldValue, errors: &mut Vec<String>) {
    let param = rule.value.as_ref();
    match rule.kind {
        RuleKind::Required => {
            if param.is_some_and(|p| p.is_truthy()) && value.is_empty() {
                errors.push(rule.message.clone());
            }
        }
        RuleKind::MinLength => {
            if let (Some(text), Some(min)) = (value.as_text(), param.and_then(|p| p.as_number())) {
                if (text.chars().count() as f64) < min {
                    errors.push(rule.message.clone());
                }
            }
        }
        RuleKind::MaxLength => {
            if let (Some(text), Some(max)) = (value.as_text(), param.and_then(|p| p.as_number())) {
                if (text.chars().count() as f64) > max {
                    errors.push(rule.message.clone());
                }
            }
        }
        RuleKind::Email => {
            if let Some(text) = value.as_text().filter(|t| !t.is_empty()) {
                if !EMAIL_PATTERN.is_match(text) {
                    errors.push(rule.message.clone());
                }
            }
        }
        RuleKind::Password => {
            if let Some(text) = value.as_text().filter(|t| !t.is_empty()) {
                if text.chars().count() < PASSWORD_MIN_CHARS {
                    errors.push(PASSWORD_TOO_SHORT.to_string());
                }
                if !text.chars().any(|c| c.is_ascii_digit()) {
                    errors.push(PASSWORD_MISSING_DIGIT.to_string());
                }
            }
        }
    }
}

/// Validates every field of a form.
///
/// Errors are ordered by field position in `fields`, then by rule order.
pub fn validate_form(fields: &[Field], values: &FormValues) -> Vec<FieldError> {
    fields
        .iter()
        .flat_map(|field| {
            validate_field(field, values.get(&field.id), values)
                .into_iter()
                .map(|message| FieldError {
                    field_id: field.id.clone(),
                    message,
                })
        })
        .collect()
}
