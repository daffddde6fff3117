/// A record of how a formula was evaluated, including intermediate values.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationTrace {
    BinaryOp {
        op_symbol: &'static str,
        left: Box<EvaluationTrace>,
        right: Box<EvaluationTrace>,
        outcome: f64,
    },
    UnaryOp {
        op_symbol: &'static str,
        child: Box<EvaluationTrace>,
        outcome: f64,
    },
    /// A number written directly in the formula.
    Literal { value: f64 },
    /// A parent field read during evaluation.
    Field { id: String, value: f64 },
}

impl EvaluationTrace {
    pub fn get_outcome(&self) -> f64 {
        match self {
            EvaluationTrace::BinaryOp { outcome, .. } => *outcome,
            EvaluationTrace::UnaryOp { outcome, .. } => *outcome,
            EvaluationTrace::Literal { value } => *value,
            EvaluationTrace::Field { value, .. } => *value,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            EvaluationTrace::BinaryOp { op_symbol, .. } => match *op_symbol {
                "+" | "-" => 6,
                "*" | "/" => 7,
                _ => 0,
            },
            EvaluationTrace::UnaryOp { .. } => 8,
            EvaluationTrace::Literal { .. } | EvaluationTrace::Field { .. } => 9,
        }
    }
}
