//! Expression grammar
//!
//! Attribute values are expressions. The parser only needs their extent, so
//! every production returns the byte span it covered rather than a tree.

use super::parser::{PResult, Parser};
use super::tokens::Token;
use logos::Span;

/// Binary operators from loosest to tightest binding.
const BINARY_LEVELS: &[&[Token]] = &[
    &[Token::OrOr],
    &[Token::AndAnd],
    &[
        Token::EqEq,
        Token::NotEq,
        Token::Lt,
        Token::Le,
        Token::Gt,
        Token::Ge,
    ],
    &[Token::Plus, Token::Minus],
    &[Token::Star, Token::Slash, Token::Percent],
];

/// Parse `text` as a single standalone expression and return the number of
/// syntax errors found. Zero means the text can be written unquoted.
pub fn validate_expression(text: &str) -> usize {
    let mut parser = Parser::new(text);
    if parser.expression().is_ok() && !parser.is_eof() {
        parser.error_expected("end of expression");
    }
    parser.error_count()
}

impl Parser<'_> {
    pub(super) fn expression(&mut self) -> PResult<Span> {
        self.nested(|parser| parser.binary(0))
    }

    fn binary(&mut self, level: usize) -> PResult<Span> {
        let Some(operators) = BINARY_LEVELS.get(level) else {
            return self.unary();
        };

        let mut span = self.binary(level + 1)?;
        while self.peek().is_some_and(|token| operators.contains(&token)) {
            self.bump();
            let rhs = self.binary(level + 1)?;
            span.end = rhs.end;
        }
        Ok(span)
    }

    fn unary(&mut self) -> PResult<Span> {
        if matches!(self.peek(), Some(Token::Minus | Token::Bang)) {
            let start = self.offset();
            self.bump();
            let operand = self.nested(Self::unary)?;
            return Ok(start..operand.end);
        }
        self.postfix()
    }

    fn postfix(&mut self) -> PResult<Span> {
        let mut span = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::LParen) => {
                    self.bump();
                    if !self.at(Token::RParen) {
                        self.expression()?;
                        while self.at(Token::Comma) {
                            self.bump();
                            self.expression()?;
                        }
                    }
                    span.end = self.expect(Token::RParen, "',' or ')'")?.end;
                }
                Some(Token::LBracket) => {
                    self.bump();
                    self.expression()?;
                    span.end = self.expect(Token::RBracket, "']'")?.end;
                }
                Some(Token::Dot) => {
                    self.bump();
                    span.end = self.expect(Token::Ident, "a member name")?.end;
                }
                _ => return Ok(span),
            }
        }
    }

    fn primary(&mut self) -> PResult<Span> {
        match self.peek() {
            Some(Token::Number | Token::Str | Token::Ident) => Ok(self.bump_span()),
            Some(Token::LParen) => {
                let start = self.offset();
                self.bump();
                self.expression()?;
                let close = self.expect(Token::RParen, "')'")?;
                Ok(start..close.end)
            }
            _ => Err(self.error_expected("an expression")),
        }
    }
}
