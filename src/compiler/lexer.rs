use crate::error::FormulaError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Identifier(name) => write!(f, "{}", name),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
        }
    }
}

/// A token together with the byte offset it starts at in the formula source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Splits formula source into tokens.
///
/// Field ids are opaque and may start with a digit, so a digit-led word that
/// does not parse as a number is read as an identifier instead.
pub fn tokenize(source: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Star),
            '/' => Some(TokenKind::Slash),
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, position });
            chars.next();
            continue;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let mut word = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if is_identifier_char(next) || next == '.' {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let kind = match word.parse::<f64>() {
                Ok(n) => TokenKind::Number(n),
                Err(_) if !word.contains('.') => TokenKind::Identifier(word),
                Err(_) => {
                    return Err(FormulaError::InvalidNumber {
                        literal: word,
                        position,
                    });
                }
            };
            tokens.push(Token { kind, position });
        } else if is_identifier_char(c) {
            let mut word = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if is_identifier_char(next) {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token {
                kind: TokenKind::Identifier(word),
                position,
            });
        } else {
            return Err(FormulaError::UnexpectedCharacter {
                character: c,
                position,
            });
        }
    }

    Ok(tokens)
}
