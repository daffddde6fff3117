//! Derived-value computation and the recomputation trigger.

use crate::ast::{FieldValue, FormValues};
use crate::compiler::{Compiler, FormulaKind};
use crate::error::EvaluationError;
use crate::interpreter::{self, Bindings};
use crate::schema::{DependencyGraph, DerivedFieldConfig, Field};
use crate::trace::TraceFormatter;
use ahash::AHashMap;
use chrono::NaiveDate;
use tracing::{debug, warn};

mod age;
mod clock;

pub use age::{calculate_age, parse_date};
pub use clock::{Clock, FixedClock, SystemClock};

/// The value computed for a field, with an explanation of how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedOutcome {
    pub value: FieldValue,
    /// A human-readable account of the computation, e.g. `$a (was 3) + $b (was 4)`.
    pub reason: String,
    /// The fault that forced the fallback value, if any.
    pub fault: Option<EvaluationError>,
}

/// Computes a field's value against the current values.
///
/// Non-derived fields yield their stored value, or their default when none is
/// stored. Derived fields evaluate their formula; any fault falls back to the
/// field's default (or `0` when the default is empty). Never fails.
pub fn compute_derived_value(field: &Field, values: &FormValues, today: NaiveDate) -> FieldValue {
    compute_derived_outcome(field, values, today).value
}

/// `compute_derived_value` evaluated against the system date.
pub fn compute_derived_value_now(field: &Field, values: &FormValues) -> FieldValue {
    compute_derived_value(field, values, SystemClock.today())
}

/// Like `compute_derived_value`, but also reports how the value was reached.
pub fn compute_derived_outcome(
    field: &Field,
    values: &FormValues,
    today: NaiveDate,
) -> DerivedOutcome {
    let Some(config) = field.derivation() else {
        return match values.get(&field.id) {
            Some(value) if !value.is_null() => DerivedOutcome {
                value: value.clone(),
                reason: "entered value".to_string(),
                fault: None,
            },
            _ => DerivedOutcome {
                value: field.default_value.clone(),
                reason: "default value".to_string(),
                fault: None,
            },
        };
    };

    match evaluate_config(config, values, today) {
        Ok((number, reason)) => DerivedOutcome {
            value: FieldValue::Number(number),
            reason,
            fault: None,
        },
        Err(fault) => {
            debug!(field = %field.id, formula = %config.formula, error = %fault, "derived value fell back to default");
            DerivedOutcome {
                value: fallback_value(field),
                reason: format!("fallback after error: {}", fault),
                fault: Some(fault),
            }
        }
    }
}

fn fallback_value(field: &Field) -> FieldValue {
    if field.default_value.is_truthy() {
        field.default_value.clone()
    } else {
        FieldValue::Number(0.0)
    }
}

fn evaluate_config(
    config: &DerivedFieldConfig,
    values: &FormValues,
    today: NaiveDate,
) -> Result<(f64, String), EvaluationError> {
    let formula = Compiler::default().compile(&config.formula)?;
    let expression = match formula.kind() {
        FormulaKind::Age => return evaluate_age(config, values, today),
        FormulaKind::Arithmetic(expression) => expression,
    };

    // Only parents the formula actually reads are converted, so an unused
    // non-numeric parent does not poison the result.
    let mut bindings = Bindings::new();
    for variable in expression.variables() {
        if !config.parent_fields.contains(&variable) {
            continue;
        }
        let operand = match values.get(&variable) {
            Some(value) => value.to_operand(&variable)?,
            None => 0.0,
        };
        bindings.insert(variable, operand);
    }

    let trace = interpreter::evaluate(expression, &bindings)?;
    let reason = TraceFormatter::format_trace(&trace);
    let outcome = trace.get_outcome();
    // Infinity maps to 0 as well as NaN, so stored values stay plain JSON numbers.
    if outcome.is_finite() {
        Ok((outcome, reason))
    } else {
        Ok((0.0, format!("{} (not a finite number)", reason)))
    }
}

fn evaluate_age(
    config: &DerivedFieldConfig,
    values: &FormValues,
    today: NaiveDate,
) -> Result<(f64, String), EvaluationError> {
    let Some(parent) = config.parent_fields.first() else {
        return Ok((0.0, "no date-of-birth field".to_string()));
    };
    let raw = match values.get(parent) {
        Some(value) if value.is_truthy() => value,
        _ => return Ok((0.0, format!("${} is empty", parent))),
    };
    let text = raw
        .as_text()
        .ok_or_else(|| EvaluationError::InvalidDate(raw.to_string()))?;

    let age = calculate_age(parse_date(text)?, today);
    Ok((age as f64, format!("calculateAge(${} (was {}))", parent, text)))
}

/// Re-evaluates every derived field against `values` and writes back the
/// ones whose computed value differs from the stored one.
///
/// Derived fields are evaluated parents-first, so chains of derived fields
/// settle in a single pass. Returns the updates that were applied; an empty
/// result means the values were already settled.
pub fn recompute_derived(
    fields: &[Field],
    values: &mut FormValues,
    today: NaiveDate,
) -> Vec<(String, FieldValue)> {
    let by_id: AHashMap<&str, &Field> = fields.iter().map(|f| (f.id.as_str(), f)).collect();
    let order: Vec<&Field> = match DependencyGraph::build(fields) {
        Ok(graph) => graph
            .evaluation_order()
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect(),
        Err(err) => {
            warn!(error = %err, "invalid derived configuration, recomputing in declaration order");
            fields.iter().filter(|f| f.is_derived()).collect()
        }
    };

    let mut updates = Vec::new();
    for field in order {
        let outcome = compute_derived_outcome(field, values, today);
        if values.get(&field.id) == Some(&outcome.value) {
            continue;
        }
        debug!(field = %field.id, value = %outcome.value, reason = %outcome.reason, "derived value updated");
        values.insert(field.id.clone(), outcome.value.clone());
        updates.push((field.id.clone(), outcome.value));
    }
    updates
}
