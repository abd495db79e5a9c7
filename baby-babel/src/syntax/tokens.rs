//! BabyScript tokens
//!
//! Tokenization is handled entirely by logos. Tokens carry no data; the parser
//! slices the source with each token's span when it needs the text.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    Str,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Assign,
    #[token(".")]
    Dot,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
}

/// Consume the rest of a `/* ... */` comment. An unterminated comment is a lex error.
fn block_comment(lex: &mut Lexer<Token>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Tokenize `source`, returning the recognised tokens and the spans logos could not match.
pub fn tokenize_with_locations(source: &str) -> (Vec<(Token, logos::Span)>, Vec<logos::Span>) {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut invalid = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => invalid.push(lexer.span()),
        }
    }

    (tokens, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize_with_locations(source)
            .0
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn tokenizes_element_with_attributes() {
        assert_eq!(
            kinds("point(1, y: 2.5);"),
            vec![
                Token::Ident,
                Token::LParen,
                Token::Number,
                Token::Comma,
                Token::Ident,
                Token::Colon,
                Token::Number,
                Token::RParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn longest_match_wins_for_operators() {
        assert_eq!(
            kinds("a <= b == c && !d"),
            vec![
                Token::Ident,
                Token::Le,
                Token::Ident,
                Token::EqEq,
                Token::Ident,
                Token::AndAnd,
                Token::Bang,
                Token::Ident,
            ]
        );
    }

    #[test]
    fn comments_keep_their_spans() {
        let source = "// note\n/* multi\nline */ x";
        let (tokens, invalid) = tokenize_with_locations(source);
        assert!(invalid.is_empty());
        assert_eq!(tokens[0].0, Token::LineComment);
        assert_eq!(&source[tokens[0].1.clone()], "// note");
        assert_eq!(tokens[1].0, Token::BlockComment);
        assert_eq!(&source[tokens[1].1.clone()], "/* multi\nline */");
        assert_eq!(tokens[2].0, Token::Ident);
    }

    #[test]
    fn string_literal_is_one_token() {
        let source = r#"say("hello, world")"#;
        let (tokens, _) = tokenize_with_locations(source);
        assert_eq!(tokens[2].0, Token::Str);
        assert_eq!(&source[tokens[2].1.clone()], "\"hello, world\"");
    }

    #[test]
    fn unknown_characters_are_reported() {
        let (tokens, invalid) = tokenize_with_locations("foo#bar");
        assert_eq!(tokens.len(), 2);
        assert_eq!(invalid, vec![3..4]);
    }

    #[test]
    fn unterminated_block_comment_is_invalid() {
        let (_, invalid) = tokenize_with_locations("/* never closed");
        assert_eq!(invalid.len(), 1);
    }
}
