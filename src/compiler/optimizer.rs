use crate::ast::Expression;

/// Applies simplification passes to a formula AST.
///
/// Only rewrites that keep every variable read in place are applied, so a
/// formula over an unbound field still fails after optimization.
pub struct AstOptimizer;

impl AstOptimizer {
    /// Runs the folding pass until the AST reaches a fixed point.
    pub fn optimize(expr: Expression) -> Expression {
        let mut current_expr = expr;
        loop {
            let next = Self::fold(current_expr.clone());
            if next == current_expr {
                return next;
            }
            current_expr = next;
        }
    }

    fn fold(expr: Expression) -> Expression {
        // Children first, then the folding rules on the rebuilt node.
        let expr = match expr {
            Expression::Sum(l, r) => {
                Expression::Sum(Box::new(Self::fold(*l)), Box::new(Self::fold(*r)))
            }
            Expression::Subtract(l, r) => {
                Expression::Subtract(Box::new(Self::fold(*l)), Box::new(Self::fold(*r)))
            }
            Expression::Multiply(l, r) => {
                Expression::Multiply(Box::new(Self::fold(*l)), Box::new(Self::fold(*r)))
            }
            Expression::Divide(l, r) => {
                Expression::Divide(Box::new(Self::fold(*l)), Box::new(Self::fold(*r)))
            }
            Expression::Negate(v) => Expression::Negate(Box::new(Self::fold(*v))),
            other => other,
        };
        Self::apply_folding_rules(expr)
    }

    fn apply_folding_rules(expr: Expression) -> Expression {
        match expr {
            Expression::Sum(l, r) => match (*l, *r) {
                (Expression::Literal(lv), Expression::Literal(rv)) => Expression::Literal(lv + rv),
                (expr, Expression::Literal(rv)) if rv == 0.0 => expr,
                (Expression::Literal(lv), expr) if lv == 0.0 => expr,
                (opt_l, opt_r) => Expression::Sum(Box::new(opt_l), Box::new(opt_r)),
            },
            Expression::Subtract(l, r) => match (*l, *r) {
                (Expression::Literal(lv), Expression::Literal(rv)) => Expression::Literal(lv - rv),
                (expr, Expression::Literal(rv)) if rv == 0.0 => expr,
                (opt_l, opt_r) => Expression::Subtract(Box::new(opt_l), Box::new(opt_r)),
            },
            Expression::Multiply(l, r) => match (*l, *r) {
                (Expression::Literal(lv), Expression::Literal(rv)) => Expression::Literal(lv * rv),
                (expr, Expression::Literal(rv)) if rv == 1.0 => expr,
                (Expression::Literal(lv), expr) if lv == 1.0 => expr,
                (opt_l, opt_r) => Expression::Multiply(Box::new(opt_l), Box::new(opt_r)),
            },
            // Literal division is left alone when the divisor is zero; the
            // interpreter owns the non-finite result handling.
            Expression::Divide(l, r) => match (*l, *r) {
                (Expression::Literal(lv), Expression::Literal(rv)) if rv != 0.0 => {
                    Expression::Literal(lv / rv)
                }
                (expr, Expression::Literal(rv)) if rv == 1.0 => expr,
                (opt_l, opt_r) => Expression::Divide(Box::new(opt_l), Box::new(opt_r)),
            },
            Expression::Negate(v) => match *v {
                Expression::Literal(n) => Expression::Literal(-n),
                Expression::Negate(inner) => *inner,
                opt_v => Expression::Negate(Box::new(opt_v)),
            },
            other => other,
        }
    }
}
