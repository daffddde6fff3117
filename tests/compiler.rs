//! Tests for formula compilation, interpretation and trace formatting.
use ahash::AHashMap;
use shiki::ast::Expression;
use shiki::compiler::MAX_DEPTH;
use shiki::interpreter::{self, Bindings};
use shiki::prelude::*;

fn bindings<const N: usize>(pairs: [(&str, f64); N]) -> Bindings {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect::<AHashMap<_, _>>()
}

fn compile(source: &str) -> Expression {
    Compiler::default()
        .compile(source)
        .unwrap()
        .expression()
        .cloned()
        .unwrap()
}

#[test]
fn test_compile_and_evaluate_sum() {
    let expr = compile("a + b");
    let trace = interpreter::evaluate(&expr, &bindings([("a", 3.0), ("b", 4.0)])).unwrap();
    assert_eq!(trace.get_outcome(), 7.0);
    assert_eq!(TraceFormatter::format_trace(&trace), "$a (was 3) + $b (was 4)");
}

#[test]
fn test_operator_precedence() {
    let expr = compile("price + qty * 2");
    let trace = interpreter::evaluate(&expr, &bindings([("price", 10.0), ("qty", 3.0)])).unwrap();
    assert_eq!(trace.get_outcome(), 16.0);
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "$price (was 10) + $qty (was 3) * 2"
    );
}

#[test]
fn test_parenthesized_right_operand_is_kept_in_trace() {
    let expr = compile("a - (b - c)");
    let trace =
        interpreter::evaluate(&expr, &bindings([("a", 10.0), ("b", 4.0), ("c", 1.0)])).unwrap();
    assert_eq!(trace.get_outcome(), 7.0);
    assert_eq!(
        TraceFormatter::format_trace(&trace),
        "$a (was 10) - ($b (was 4) - $c (was 1))"
    );
}

#[test]
fn test_unary_minus() {
    let expr = compile("-a * 2");
    let trace = interpreter::evaluate(&expr, &bindings([("a", 1.5)])).unwrap();
    assert_eq!(trace.get_outcome(), -3.0);
    assert_eq!(TraceFormatter::format_trace(&trace), "-$a (was 1.5) * 2");
}

#[test]
fn test_constant_subexpressions_are_folded() {
    assert_eq!(compile("2 * (3 + 4)"), Expression::Literal(14.0));
    assert_eq!(
        compile("(1 + 1) * total"),
        Expression::Multiply(
            Box::new(Expression::Literal(2.0)),
            Box::new(Expression::Variable("total".to_string()))
        )
    );
    assert_eq!(compile("a * 1 + 0"), Expression::Variable("a".to_string()));
}

#[test]
fn test_optimization_can_be_disabled() {
    let compiler = Compiler::builder().with_optimization(false).build();
    let formula = compiler.compile("1 + 2").unwrap();
    assert_eq!(
        formula.expression(),
        Some(&Expression::Sum(
            Box::new(Expression::Literal(1.0)),
            Box::new(Expression::Literal(2.0))
        ))
    );
}

#[test]
fn test_division_by_zero_is_not_folded_away() {
    let expr = compile("a / 0");
    let trace = interpreter::evaluate(&expr, &bindings([("a", 5.0)])).unwrap();
    assert!(trace.get_outcome().is_infinite());
}

#[test]
fn test_unbound_variable_fails() {
    let expr = compile("a + missing");
    let err = interpreter::evaluate(&expr, &bindings([("a", 1.0)])).unwrap_err();
    assert_eq!(err, EvaluationError::UnboundVariable("missing".to_string()));
}

#[test]
fn test_variables_in_first_appearance_order() {
    let expr = compile("b * a + b - c");
    assert_eq!(expr.variables(), vec!["b", "a", "c"]);
}

#[test]
fn test_age_formula_is_recognized() {
    let formula = Compiler::default().compile("calculateAge(dob)").unwrap();
    assert_eq!(formula.kind(), &FormulaKind::Age);
    assert!(formula.expression().is_none());
    assert_eq!(formula.source(), "calculateAge(dob)");
}

#[test]
fn test_malformed_formulas_are_rejected() {
    let compiler = Compiler::default();
    assert!(matches!(
        compiler.compile("a +"),
        Err(FormulaError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        compiler.compile("a + + * b"),
        Err(FormulaError::UnexpectedToken { .. })
    ));
    assert!(matches!(
        compiler.compile("a % b"),
        Err(FormulaError::UnexpectedCharacter { character: '%', position: 2 })
    ));
    assert_eq!(compiler.compile(""), Err(FormulaError::Empty));
}

#[test]
fn test_nesting_beyond_limit_is_rejected() {
    let compiler = Compiler::default();
    let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert!(compiler.compile(&nested(MAX_DEPTH - 1)).is_ok());
    assert!(matches!(
        compiler.compile(&nested(MAX_DEPTH + 1)),
        Err(FormulaError::TooDeep { limit: MAX_DEPTH, .. })
    ));
}

#[test]
fn test_expression_tree_display() {
    let tree = compile("a + b * c").display_tree().to_string();
    assert!(tree.starts_with("└── Sum (+)"));
    assert!(tree.contains("Multiply (*)"));
    assert!(tree.contains("Field: $c"));
}
