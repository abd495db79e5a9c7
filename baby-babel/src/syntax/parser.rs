//! Recursive descent parser for BabyScript documents
//!
//! ```text
//! document   := node* EOF
//! node       := comment | assignment | element
//! assignment := IDENT '=' expr ';'
//! element    := IDENT ( '(' attributes? ')' )? ( ';' | '{' node* '}' )
//! attribute  := IDENT ':' expr | expr
//! ```
//!
//! After an error the parser skips to and consumes the next `;` or `}`.

use super::line_index::LineIndex;
use super::tokens::{tokenize_with_locations, Token};
use crate::model::{
    Attribute, Comment, Document, Element, Node, ParseResult, Position, SyntaxError,
};
use logos::Span;

/// Deepest block or expression nesting the parser will descend into.
pub(super) const MAX_NESTING: usize = 128;

/// A production failed; its error is already recorded.
#[derive(Debug)]
pub(super) struct Failed;

pub(super) type PResult<T> = Result<T, Failed>;

pub(super) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Span)>,
    cursor: usize,
    index: LineIndex<'src>,
    errors: Vec<SyntaxError>,
    depth: usize,
}

/// Parse a BabyScript source text.
///
/// Always returns a document; check [`ParseResult::errors`] before trusting it.
pub fn parse(source: &str) -> ParseResult {
    let mut parser = Parser::new(source);
    let mut children = Vec::new();

    while !parser.is_eof() {
        match parser.node() {
            Ok(node) => children.push(node),
            Err(Failed) => parser.recover(),
        }
    }

    parser.finish(Document::with_content(children))
}

impl<'src> Parser<'src> {
    pub(super) fn new(source: &'src str) -> Self {
        let index = LineIndex::new(source);
        let (tokens, invalid) = tokenize_with_locations(source);
        let errors = invalid
            .into_iter()
            .map(|span| SyntaxError {
                position: index.position(span.start),
                message: format!("unrecognised input '{}'", &source[span]),
            })
            .collect();

        Self {
            source,
            tokens,
            cursor: 0,
            index,
            errors,
            depth: 0,
        }
    }

    fn finish(mut self, document: Document) -> ParseResult {
        self.errors
            .sort_by_key(|error| (error.position.line, error.position.column));
        ParseResult {
            document,
            errors: self.errors,
        }
    }

    pub(super) fn error_count(&self) -> usize {
        self.errors.len()
    }

    // Cursor

    pub(super) fn peek(&self) -> Option<Token> {
        self.peek_nth(0)
    }

    pub(super) fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.cursor + n).map(|(token, _)| *token)
    }

    pub(super) fn at(&self, token: Token) -> bool {
        self.peek() == Some(token)
    }

    pub(super) fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    pub(super) fn bump(&mut self) -> Option<(Token, Span)> {
        let next = self.tokens.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }

    pub(super) fn bump_span(&mut self) -> Span {
        let end = self.source.len();
        self.bump().map_or(end..end, |(_, span)| span)
    }

    /// Byte offset of the next token, or the end of the source.
    pub(super) fn offset(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.source.len(), |(_, span)| span.start)
    }

    pub(super) fn slice(&self, span: Span) -> &'src str {
        &self.source[span]
    }

    pub(super) fn expect(&mut self, token: Token, what: &str) -> PResult<Span> {
        match self.tokens.get(self.cursor) {
            Some((found, span)) if *found == token => {
                let span = span.clone();
                self.cursor += 1;
                Ok(span)
            }
            _ => Err(self.error_expected(what)),
        }
    }

    pub(super) fn error_expected(&mut self, what: &str) -> Failed {
        let found = match self.tokens.get(self.cursor) {
            Some((_, span)) => format!("'{}'", &self.source[span.clone()]),
            None => "end of input".to_string(),
        };
        let position = self.index.position(self.offset());
        self.errors.push(SyntaxError {
            position,
            message: format!("expected {what}, found {found}"),
        });
        Failed
    }

    /// Run `production` one nesting level deeper, failing past [`MAX_NESTING`].
    pub(super) fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= MAX_NESTING {
            let position = self.index.position(self.offset());
            self.errors.push(SyntaxError {
                position,
                message: format!("nesting deeper than {MAX_NESTING} levels"),
            });
            return Err(Failed);
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    fn recover(&mut self) {
        while let Some((token, _)) = self.bump() {
            if matches!(token, Token::Semicolon | Token::RBrace) {
                break;
            }
        }
    }

    fn position(&self, offset: usize) -> Position {
        self.index.position(offset)
    }

    // Productions

    fn node(&mut self) -> PResult<Node> {
        match self.peek() {
            Some(Token::LineComment) => {
                let span = self.bump_span();
                let text = &self.source[span.start + 2..span.end];
                Ok(Node::Comment(self.comment(text, span.start)))
            }
            Some(Token::BlockComment) => {
                let span = self.bump_span();
                let text = &self.source[span.start + 2..span.end - 2];
                Ok(Node::Comment(self.comment(text, span.start)))
            }
            Some(Token::Ident) if self.peek_nth(1) == Some(Token::Assign) => {
                self.assignment().map(Node::Element)
            }
            Some(Token::Ident) => self.element().map(Node::Element),
            _ => Err(self.error_expected("an element, assignment or comment")),
        }
    }

    fn comment(&self, text: &str, offset: usize) -> Comment {
        Comment {
            text: text.to_string(),
            position: self.position(offset),
        }
    }

    fn assignment(&mut self) -> PResult<Element> {
        let name = self.expect(Token::Ident, "a name")?;
        self.expect(Token::Assign, "'='")?;
        let value = self.expression()?;
        self.expect(Token::Semicolon, "';'")?;

        let position = self.position(name.start);
        Ok(Element::assignment(self.slice(name), self.slice(value)).at(position))
    }

    fn element(&mut self) -> PResult<Element> {
        let tag = self.expect(Token::Ident, "a tag name")?;

        let mut attributes = Vec::new();
        if self.at(Token::LParen) {
            self.bump();
            if !self.at(Token::RParen) {
                loop {
                    attributes.push(self.attribute()?);
                    if !self.at(Token::Comma) {
                        break;
                    }
                    self.bump();
                }
            }
            self.expect(Token::RParen, "',' or ')'")?;
        }

        let children = match self.peek() {
            Some(Token::Semicolon) => {
                self.bump();
                Vec::new()
            }
            Some(Token::LBrace) => {
                self.bump();
                self.nested(Self::block)?
            }
            _ => return Err(self.error_expected("';' or '{'")),
        };

        let position = self.position(tag.start);
        Ok(Element::new(self.slice(tag), attributes, children).at(position))
    }

    fn block(&mut self) -> PResult<Vec<Node>> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBrace) => {
                    self.bump();
                    return Ok(children);
                }
                None => return Err(self.error_expected("'}'")),
                Some(_) => match self.node() {
                    Ok(node) => children.push(node),
                    Err(Failed) => self.recover(),
                },
            }
        }
    }

    fn attribute(&mut self) -> PResult<Attribute> {
        if self.at(Token::Ident) && self.peek_nth(1) == Some(Token::Colon) {
            let name = self.bump_span();
            self.bump();
            let value = self.expression()?;
            return Ok(Attribute::named(self.slice(name), self.slice(value)));
        }

        let value = self.expression()?;
        Ok(Attribute::anonymous(self.slice(value)))
    }
}
