use crate::ast::Expression;
use crate::error::FormulaError;

mod lexer;
mod optimizer;
mod parser;

pub use lexer::{Token, TokenKind, tokenize};
pub use optimizer::AstOptimizer;
pub use parser::MAX_DEPTH;
use parser::Parser;

/// Name of the built-in birth-date function recognised inside formulas.
pub const AGE_FUNCTION: &str = "calculateAge";

/// A formula compiled into an evaluable expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    kind: FormulaKind,
}

/// What a derived field's formula computes.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaKind {
    /// Whole years since the date held by the field's first parent.
    Age,
    /// An arithmetic expression over parent field values.
    Arithmetic(Expression),
}

impl Formula {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> &FormulaKind {
        &self.kind
    }

    /// The arithmetic expression, if this is not an age formula.
    pub fn expression(&self) -> Option<&Expression> {
        match &self.kind {
            FormulaKind::Arithmetic(expr) => Some(expr),
            FormulaKind::Age => None,
        }
    }
}

/// True when the formula text asks for the built-in age computation.
///
/// Any mention of the function name selects it, whatever else the formula says.
pub fn is_age_formula(source: &str) -> bool {
    source.contains(AGE_FUNCTION)
}

/// Compiles formula source text into a `Formula`.
pub struct Compiler {
    optimize: bool,
}

pub struct CompilerBuilder {
    optimize: bool,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self { optimize: true }
    }

    /// Enables or disables the constant-folding pass (enabled by default).
    pub fn with_optimization(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            optimize: self.optimize,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Compiler {
    fn default() -> Self {
        CompilerBuilder::new().build()
    }
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn compile(&self, source: &str) -> Result<Formula, FormulaError> {
        if is_age_formula(source) {
            return Ok(Formula {
                source: source.to_string(),
                kind: FormulaKind::Age,
            });
        }

        let tokens = tokenize(source)?;
        let naive_ast = Parser::new(&tokens).parse()?;
        let ast = if self.optimize {
            AstOptimizer::optimize(naive_ast)
        } else {
            naive_ast
        };

        Ok(Formula {
            source: source.to_string(),
            kind: FormulaKind::Arithmetic(ast),
        })
    }
}
