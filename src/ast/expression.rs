use super::format_number;
use itertools::Itertools;
use std::fmt;

/// The Abstract Syntax Tree of a compiled formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Arithmetic
    Sum(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Negate(Box<Expression>),

    // Leaf nodes
    Literal(f64),
    Variable(String),
}

impl Expression {
    /// Collects every variable the expression reads, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.collect_variables(&mut found);
        found.into_iter().unique().collect()
    }

    fn collect_variables(&self, found: &mut Vec<String>) {
        match self {
            Expression::Variable(name) => found.push(name.clone()),
            Expression::Sum(l, r)
            | Expression::Subtract(l, r)
            | Expression::Multiply(l, r)
            | Expression::Divide(l, r) => {
                l.collect_variables(found);
                r.collect_variables(found);
            }
            Expression::Negate(v) => v.collect_variables(found),
            Expression::Literal(_) => {}
        }
    }

    /// Returns a tree-shaped rendering of the expression, useful for debugging formulas.
    pub fn display_tree(&self) -> DisplayExpression<'_> {
        DisplayExpression { expr: self }
    }
}

/// A wrapper to display an expression as an indented tree.
pub struct DisplayExpression<'a> {
    pub expr: &'a Expression,
}

impl<'a> fmt::Display for DisplayExpression<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_as_tree(self.expr, f, "", true)
    }
}

impl<'a> DisplayExpression<'a> {
    fn fmt_as_tree(
        &self,
        expr: &Expression,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match expr {
            Expression::Literal(v) => writeln!(f, "Literal: {}", format_number(*v))?,
            Expression::Variable(name) => writeln!(f, "Field: ${}", name)?,
            Expression::Negate(v) => {
                writeln!(f, "Negate (-)")?;
                self.fmt_as_tree(v, f, &child_prefix, true)?;
            }
            Expression::Sum(l, r) => self.fmt_binary(f, "Sum (+)", l, r, &child_prefix)?,
            Expression::Subtract(l, r) => {
                self.fmt_binary(f, "Subtract (-)", l, r, &child_prefix)?
            }
            Expression::Multiply(l, r) => {
                self.fmt_binary(f, "Multiply (*)", l, r, &child_prefix)?
            }
            Expression::Divide(l, r) => self.fmt_binary(f, "Divide (/)", l, r, &child_prefix)?,
        }
        Ok(())
    }

    fn fmt_binary(
        &self,
        f: &mut fmt::Formatter<'_>,
        name: &str,
        l: &Expression,
        r: &Expression,
        prefix: &str,
    ) -> fmt::Result {
        writeln!(f, "{}", name)?;
        self.fmt_as_tree(l, f, prefix, false)?;
        self.fmt_as_tree(r, f, prefix, true)?;
        Ok(())
    }
}
