use super::Bindings;
use crate::ast::{EvaluationTrace, Expression};
use crate::error::EvaluationError;

// This macro generates a match arm for a binary arithmetic operation.
macro_rules! eval_op {
    ($self:ident, $l:ident, $r:ident, $op_str:expr, $op_fn:expr) => {
        $self.eval_binary($l, $r, $op_str, $op_fn)
    };
}

/// The core recursive engine for evaluating a single formula AST.
pub(super) struct AstEngine<'a> {
    expression: &'a Expression,
    bindings: &'a Bindings,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(expression: &'a Expression, bindings: &'a Bindings) -> Self {
        Self {
            expression,
            bindings,
        }
    }

    /// Evaluates the AST and returns a trace of the execution.
    pub(super) fn evaluate(&self) -> Result<EvaluationTrace, EvaluationError> {
        self.evaluate_recursive(self.expression)
    }

    fn evaluate_recursive(&self, expr: &Expression) -> Result<EvaluationTrace, EvaluationError> {
        match expr {
            Expression::Sum(l, r) => eval_op!(self, l, r, "+", |a, b| a + b),
            Expression::Subtract(l, r) => eval_op!(self, l, r, "-", |a, b| a - b),
            Expression::Multiply(l, r) => eval_op!(self, l, r, "*", |a, b| a * b),
            Expression::Divide(l, r) => eval_op!(self, l, r, "/", |a, b| a / b),
            Expression::Negate(v) => {
                let child_trace = self.evaluate_recursive(v)?;
                let outcome = -child_trace.get_outcome();
                Ok(EvaluationTrace::UnaryOp {
                    op_symbol: "-",
                    child: Box::new(child_trace),
                    outcome,
                })
            }
            Expression::Literal(value) => Ok(EvaluationTrace::Literal { value: *value }),
            Expression::Variable(name) => {
                let value = self
                    .bindings
                    .get(name)
                    .copied()
                    .ok_or_else(|| EvaluationError::UnboundVariable(name.clone()))?;
                Ok(EvaluationTrace::Field {
                    id: name.clone(),
                    value,
                })
            }
        }
    }

    fn eval_binary(
        &self,
        l: &Expression,
        r: &Expression,
        op_symbol: &'static str,
        op_fn: fn(f64, f64) -> f64,
    ) -> Result<EvaluationTrace, EvaluationError> {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        let outcome = op_fn(left_trace.get_outcome(), right_trace.get_outcome());
        Ok(EvaluationTrace::BinaryOp {
            op_symbol,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome,
        })
    }
}
