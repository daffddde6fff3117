use super::lexer::{Token, TokenKind};
use crate::ast::Expression;
use crate::error::FormulaError;

/// Deepest expression tree, and deepest unary/parenthesis nesting, a formula may use.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over the formula grammar:
///
/// ```text
/// expression := term (("+" | "-") term)*
/// term       := unary (("*" | "/") unary)*
/// unary      := ("+" | "-") unary | primary
/// primary    := NUMBER | IDENTIFIER | "(" expression ")"
/// ```
///
/// Every parse function returns the expression together with its tree depth.
pub(super) struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            nesting: 0,
        }
    }

    /// Parses the whole token stream into a single expression.
    pub(super) fn parse(mut self) -> Result<Expression, FormulaError> {
        if self.tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        let (expr, _) = self.parse_expression()?;
        if let Some(token) = self.peek() {
            return Err(FormulaError::UnexpectedToken {
                found: token.kind.to_string(),
                expected: "an operator or end of formula".to_string(),
                position: token.position,
            });
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor);
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    fn position(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(0, |token| token.position)
    }

    fn too_deep(&self) -> FormulaError {
        FormulaError::TooDeep {
            position: self.position(),
            limit: MAX_DEPTH,
        }
    }

    /// Depth of a node whose deepest child has depth `child`.
    fn node_depth(&self, child: usize) -> Result<usize, FormulaError> {
        if child >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(child + 1)
    }

    fn parse_expression(&mut self) -> Result<(Expression, usize), FormulaError> {
        let (mut left, mut depth) = self.parse_term()?;
        while let Some(token) = self.peek() {
            let build: fn(Box<Expression>, Box<Expression>) -> Expression = match token.kind {
                TokenKind::Plus => Expression::Sum,
                TokenKind::Minus => Expression::Subtract,
                _ => break,
            };
            self.advance();
            let (right, right_depth) = self.parse_term()?;
            depth = self.node_depth(depth.max(right_depth))?;
            left = build(Box::new(left), Box::new(right));
        }
        Ok((left, depth))
    }

    fn parse_term(&mut self) -> Result<(Expression, usize), FormulaError> {
        let (mut left, mut depth) = self.parse_unary()?;
        while let Some(token) = self.peek() {
            let build: fn(Box<Expression>, Box<Expression>) -> Expression = match token.kind {
                TokenKind::Star => Expression::Multiply,
                TokenKind::Slash => Expression::Divide,
                _ => break,
            };
            self.advance();
            let (right, right_depth) = self.parse_unary()?;
            depth = self.node_depth(depth.max(right_depth))?;
            left = build(Box::new(left), Box::new(right));
        }
        Ok((left, depth))
    }

    // Every nested `(` and unary sign passes through here.
    fn parse_unary(&mut self) -> Result<(Expression, usize), FormulaError> {
        if self.nesting >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        self.nesting += 1;
        let parsed = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Minus) => {
                self.advance();
                let (inner, depth) = self.parse_unary()?;
                (Expression::Negate(Box::new(inner)), self.node_depth(depth)?)
            }
            Some(TokenKind::Plus) => {
                self.advance();
                self.parse_unary()?
            }
            _ => self.parse_primary()?,
        };
        self.nesting -= 1;
        Ok(parsed)
    }

    fn parse_primary(&mut self) -> Result<(Expression, usize), FormulaError> {
        let token = self.advance().ok_or_else(|| FormulaError::UnexpectedEnd {
            expected: "a number, field or '('".to_string(),
        })?;

        match &token.kind {
            TokenKind::Number(n) => Ok((Expression::Literal(*n), 1)),
            TokenKind::Identifier(name) => Ok((Expression::Variable(name.clone()), 1)),
            TokenKind::LeftParen => {
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        found: other.kind.to_string(),
                        expected: "')'".to_string(),
                        position: other.position,
                    }),
                    None => Err(FormulaError::UnexpectedEnd {
                        expected: "')'".to_string(),
                    }),
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                found: other.to_string(),
                expected: "a number, field or '('".to_string(),
                position: token.position,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::tokenize;

    fn parse(source: &str) -> Result<Expression, FormulaError> {
        let tokens = tokenize(source)?;
        Parser::new(&tokens).parse()
    }

    fn var(name: &str) -> Box<Expression> {
        Box::new(Expression::Variable(name.to_string()))
    }

    #[test]
    fn test_precedence_and_associativity() {
        // a - b - c * d  ==  (a - b) - (c * d)
        let expr = parse("a - b - c * d").unwrap();
        assert_eq!(
            expr,
            Expression::Subtract(
                Box::new(Expression::Subtract(var("a"), var("b"))),
                Box::new(Expression::Multiply(var("c"), var("d"))),
            )
        );
    }

    #[test]
    fn test_parentheses_and_unary() {
        let expr = parse("-(a + 2)").unwrap();
        assert_eq!(
            expr,
            Expression::Negate(Box::new(Expression::Sum(
                var("a"),
                Box::new(Expression::Literal(2.0))
            )))
        );
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(
            parse("(a + b"),
            Err(FormulaError::UnexpectedEnd {
                expected: "')'".to_string()
            })
        );
        assert!(matches!(
            parse("a + b)"),
            Err(FormulaError::UnexpectedToken { position: 5, .. })
        ));
    }

    #[test]
    fn test_dangling_operator_and_empty() {
        assert!(matches!(
            parse("a +"),
            Err(FormulaError::UnexpectedEnd { .. })
        ));
        assert_eq!(parse("   "), Err(FormulaError::Empty));
        assert!(matches!(
            parse("a b"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |n: usize| format!("{}a{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&nested(MAX_DEPTH - 1)).is_ok());
        assert!(matches!(
            parse(&nested(10_000)),
            Err(FormulaError::TooDeep { position: 256, .. })
        ));
        assert!(matches!(
            parse(&"-".repeat(10_000)),
            Err(FormulaError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_long_chains_are_limited_by_tree_depth() {
        let chain = |n: usize| vec!["a"; n].join(" + ");
        let (_, depth) = {
            let tokens = tokenize(&chain(MAX_DEPTH)).unwrap();
            Parser::new(&tokens).parse_expression().unwrap()
        };
        assert_eq!(depth, MAX_DEPTH);
        assert!(matches!(
            parse(&chain(MAX_DEPTH + 1)),
            Err(FormulaError::TooDeep { .. })
        ));
    }
}
