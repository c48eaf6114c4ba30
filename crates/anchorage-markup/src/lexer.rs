//! # Lexer
//!
//! Splits markup into tags and text runs with [Logos]. The lexer is
//! lossless: concatenating every token's text gives back the input.
//!
//! [Logos]: https://docs.rs/logos
//!
//! Anything Logos cannot match (a stray `<` not followed by a tag name) is
//! reported as [`TokenKind::Text`], so no input is ever rejected.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- comment -->`, `<!DOCTYPE ...>`, `<?xml ...?>`
    #[regex(r"<[!?][^>]*>")]
    Declaration,

    /// `<p>`, `<a href="#">`, `<br/>`
    #[regex(r"<[A-Za-z][^<>]*>")]
    StartTag,

    /// `</p>`
    #[regex(r"</[A-Za-z][^<>]*>")]
    EndTag,

    #[regex(r"[^<]+")]
    Text,
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// Lower-cased tag name of a start or end tag.
    pub fn tag_name(&self) -> Option<String> {
        let rest = match self.kind {
            TokenKind::StartTag => &self.text[1..],
            TokenKind::EndTag => &self.text[2..],
            _ => return None,
        };
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Some(name)
    }

    /// `<br/>`-style start tag.
    pub fn is_self_closing(&self) -> bool {
        self.kind == TokenKind::StartTag && self.text.ends_with("/>")
    }
}

pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            kind: result.unwrap_or(TokenKind::Text),
            text: lexer.slice(),
        });
    }

    tokens
}
