//! Lexer and recursive-descent parser for the conductivity formula language.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('**' | '^') unary)?
//! primary := NUMBER | NAME | NAME '(' expr ')' | '(' expr ')'
//! ```
//!
//! `power` takes a `unary` on its right, so `2**-1` parses and `-2**2` is
//! `-(2**2)`. `//` floors the quotient and `%` takes the sign of the divisor.
//!
//! Nesting is capped at [`MAX_DEPTH`] levels. Every unary operator,
//! parenthesis, call and chained operand counts as one level, which also
//! bounds the depth of the tree handed to the recursive evaluator.

use std::f64::consts::{E, PI};
use std::fmt;

use crate::error::FormulaError;
use crate::formula::ast::{BinaryOp, Expr, Function};

pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    /// Spelled `**` or `^`
    Pow(&'static str),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Name(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::SlashSlash => write!(f, "//"),
            Token::Percent => write!(f, "%"),
            Token::Pow(spelling) => write!(f, "{}", spelling),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

struct Spanned {
    token: Token,
    position: usize,
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, FormulaError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let position = i;

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // exponent only when digits follow, so "2e" stays a number then a name
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| FormulaError::InvalidNumber { text: literal.clone() })?;
            tokens.push(Spanned { token: Token::Number(value), position });
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            tokens.push(Spanned { token: Token::Name(name), position });
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Pow("**")
            }
            '*' => Token::Star,
            '/' if chars.get(i + 1) == Some(&'/') => {
                i += 1;
                Token::SlashSlash
            }
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Pow("^"),
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(FormulaError::UnexpectedChar { ch: other, position }),
        };
        tokens.push(Spanned { token, position });
        i += 1;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn descend(&mut self) -> Result<(), FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Option<&Spanned> {
        let spanned = self.tokens.get(self.cursor);
        if spanned.is_some() {
            self.cursor += 1;
        }
        spanned
    }

    fn unexpected(&self) -> FormulaError {
        match self.tokens.get(self.cursor) {
            Some(spanned) => FormulaError::UnexpectedToken {
                token: spanned.token.to_string(),
                position: spanned.position,
            },
            None => FormulaError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        if self.peek() == Some(&expected) {
            self.cursor += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // chained operands grow a left-deep tree, so each one costs a level
    fn parse_expr(&mut self) -> Result<Expr, FormulaError> {
        let depth = self.depth;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.cursor += 1;
            self.descend()?;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, FormulaError> {
        let depth = self.depth;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::SlashSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.cursor += 1;
            self.descend()?;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, FormulaError> {
        self.descend()?;
        let expr = match self.peek() {
            Some(Token::Minus) => {
                self.cursor += 1;
                Expr::Neg(Box::new(self.parse_unary()?))
            }
            Some(Token::Plus) => {
                self.cursor += 1;
                self.parse_unary()?
            }
            _ => self.parse_power()?,
        };
        self.depth -= 1;
        Ok(expr)
    }

    fn parse_power(&mut self) -> Result<Expr, FormulaError> {
        let base = self.parse_primary()?;
        if matches!(self.peek(), Some(Token::Pow(_))) {
            self.cursor += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        let Some(spanned) = self.advance() else {
            return Err(FormulaError::UnexpectedEnd);
        };
        let position = spanned.position;

        match spanned.token.clone() {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::LParen => {
                self.descend()?;
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                self.depth -= 1;
                Ok(inner)
            }
            Token::Name(name) => {
                if self.peek() == Some(&Token::LParen) {
                    let function = Function::from_name(&name)
                        .ok_or_else(|| FormulaError::UnknownFunction { name: name.clone() })?;
                    self.cursor += 1;
                    self.descend()?;
                    let arg = self.parse_expr()?;
                    self.expect(Token::RParen)?;
                    self.depth -= 1;
                    Ok(Expr::Call { function, arg: Box::new(arg) })
                } else {
                    resolve_name(&name)
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                token: other.to_string(),
                position,
            }),
        }
    }
}

fn resolve_name(name: &str) -> Result<Expr, FormulaError> {
    match name {
        "T" => Ok(Expr::Temperature),
        "pi" | "math.pi" => Ok(Expr::Number(PI)),
        "e" | "math.e" => Ok(Expr::Number(E)),
        _ => Err(FormulaError::UnknownName { name: name.to_string() }),
    }
}

/// Parses already-normalized formula text into an expression tree.
pub fn parse(text: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.parse_expr()?;
    if parser.cursor < parser.tokens.len() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(text: &str, t: f64) -> f64 {
        parse(text).unwrap().eval(t)
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_relative_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_relative_eq!(eval("8 / 4 / 2", 0.0), 1.0);
        assert_relative_eq!(eval("10 - 4 - 3", 0.0), 3.0);
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_negation() {
        assert_relative_eq!(eval("2 ** 3 ** 2", 0.0), 512.0);
        assert_relative_eq!(eval("-2**2", 0.0), -4.0);
        assert_relative_eq!(eval("2**-1", 0.0), 0.5);
        assert_relative_eq!(eval("T^2", 3.0), 9.0);
    }

    #[test]
    fn test_scientific_notation() {
        assert_relative_eq!(eval("1.5e-4 * T", 100.0), 0.015, epsilon = 1e-15);
        assert_relative_eq!(eval("2E+2", 0.0), 200.0);
        assert_relative_eq!(eval(".5", 0.0), 0.5);
    }

    #[test]
    fn test_constants_and_functions() {
        assert_relative_eq!(eval("math.exp(0)", 0.0), 1.0);
        assert_relative_eq!(eval("log(e)", 0.0), 1.0);
        assert_relative_eq!(eval("math.sqrt(T)", 16.0), 4.0);
        assert_relative_eq!(eval("math.cos(math.pi)", 0.0), -1.0);
    }

    #[test]
    fn test_rejects_unknown_names() {
        assert_eq!(
            parse("0.035 + foo * T"),
            Err(FormulaError::UnknownName { name: "foo".into() })
        );
        assert_eq!(
            parse("__import__(T)"),
            Err(FormulaError::UnknownFunction { name: "__import__".into() })
        );
        assert_eq!(
            parse("t * 2"),
            Err(FormulaError::UnknownName { name: "t".into() })
        );
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert_eq!(parse(""), Err(FormulaError::Empty));
        assert_eq!(parse("   "), Err(FormulaError::Empty));
        assert_eq!(parse("0.03 +"), Err(FormulaError::UnexpectedEnd));
        assert_eq!(parse("(0.03"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(
            parse("0.03 0.04"),
            Err(FormulaError::UnexpectedToken { position: 5, .. })
        ));
        assert!(matches!(parse("0.03; 1"), Err(FormulaError::UnexpectedChar { ch: ';', .. })));
        assert!(matches!(parse("1.2.3"), Err(FormulaError::InvalidNumber { .. })));
        assert!(matches!(parse("* T"), Err(FormulaError::UnexpectedToken { .. })));
        // "2e" is a number followed by a name, not a truncated exponent
        assert!(matches!(parse("2e"), Err(FormulaError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_floor_division_and_remainder() {
        assert_relative_eq!(eval("7 // 2", 0.0), 3.0);
        assert_relative_eq!(eval("-7 // 2", 0.0), -4.0);
        assert_relative_eq!(eval("7 % 3", 0.0), 1.0);
        assert_relative_eq!(eval("-7 % 3", 0.0), 2.0);
        assert_relative_eq!(eval("7 % -3", 0.0), -2.0);
        assert_relative_eq!(eval("0.03 + T % 100 * 0.0001", 250.0), 0.035, epsilon = 1e-12);
        assert!(eval("T % 0", 10.0).is_nan());
        assert!(eval("1 // 0", 0.0).is_infinite());
    }

    #[test]
    fn test_error_shows_power_as_written() {
        assert_eq!(
            parse("T ^ ^ 2"),
            Err(FormulaError::UnexpectedToken { token: "^".into(), position: 4 })
        );
        assert_eq!(
            parse("T ** ** 2"),
            Err(FormulaError::UnexpectedToken { token: "**".into(), position: 5 })
        );
    }

    #[test]
    fn test_nesting_limit() {
        let too_deep = FormulaError::TooDeep { limit: MAX_DEPTH };
        assert_eq!(parse(&"(".repeat(100_000)), Err(too_deep.clone()));
        assert_eq!(parse(&format!("{}0.035", "-".repeat(100_000))), Err(too_deep.clone()));
        assert_eq!(parse(&format!("{}T", "exp(".repeat(100_000))), Err(too_deep.clone()));
        assert_eq!(parse(&format!("{}2", "2**".repeat(100_000))), Err(too_deep.clone()));
        assert_eq!(parse(&format!("T{}", " + T".repeat(100_000))), Err(too_deep.clone()));
        assert_eq!(parse(&format!("T{}", " * 1".repeat(100_000))), Err(too_deep));
    }

    #[test]
    fn test_reasonable_nesting_still_parses() {
        let nested = format!("{}T{}", "(".repeat(60), ")".repeat(60));
        assert_relative_eq!(eval(&nested, 7.0), 7.0);
        assert_relative_eq!(eval(&format!("{}T", "-".repeat(100)), 3.0), 3.0);

        let sum = format!("0{}", " + 0.001".repeat(100));
        assert_relative_eq!(eval(&sum, 0.0), 0.1, epsilon = 1e-12);

        // depth is released when a group closes, so siblings do not add up
        let siblings = vec![format!("{}T{}", "(".repeat(60), ")".repeat(60)); 50].join(" * ");
        assert_relative_eq!(eval(&siblings, 1.0), 1.0);
    }
}
