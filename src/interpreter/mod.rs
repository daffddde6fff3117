use crate::ast::{EvaluationTrace, Expression};
use crate::error::EvaluationError;
use ahash::AHashMap;

mod engine;

use engine::AstEngine;

/// Numeric values bound to formula variables, keyed by field id.
pub type Bindings = AHashMap<String, f64>;

/// Evaluates a formula expression against a set of variable bindings.
///
/// Returns the full evaluation trace; the numeric result is
/// `trace.get_outcome()`. Reading a variable that has no binding is an error.
pub fn evaluate(
    expression: &Expression,
    bindings: &Bindings,
) -> Result<EvaluationTrace, EvaluationError> {
    AstEngine::new(expression, bindings).evaluate()
}
