use crate::ast::{EvaluationTrace, format_number};

/// Formats evaluation traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format an evaluation trace into a human-readable explanation,
    /// e.g. `$price (was 3) * 2`.
    pub fn format_trace(trace: &EvaluationTrace) -> String {
        // Start the recursive formatting with the lowest possible parent precedence.
        Self::format_recursive(trace, 0, false)
    }

    /// Recursively formats the trace, adding parentheses only when necessary.
    ///
    /// `right_operand` marks the right side of a binary operator, where an
    /// equal-precedence child still needs parentheses (`a - (b - c)`).
    fn format_recursive(trace: &EvaluationTrace, parent_precedence: u8, right_operand: bool) -> String {
        let current_precedence = trace.precedence();
        let needs_parens = current_precedence < parent_precedence
            || (right_operand && current_precedence == parent_precedence);

        let body = match trace {
            EvaluationTrace::BinaryOp {
                op_symbol,
                left,
                right,
                ..
            } => {
                let left_str = Self::format_recursive(left, current_precedence, false);
                let right_str = Self::format_recursive(right, current_precedence, true);
                format!("{} {} {}", left_str, op_symbol, right_str)
            }
            EvaluationTrace::UnaryOp {
                op_symbol, child, ..
            } => {
                let child_str = Self::format_recursive(child, current_precedence, false);
                format!("{}{}", op_symbol, child_str)
            }
            EvaluationTrace::Literal { value } => format_number(*value),
            EvaluationTrace::Field { id, value } => {
                format!("${} (was {})", id, format_number(*value))
            }
        };

        if needs_parens {
            format!("({})", body)
        } else {
            body
        }
    }
}
