pub mod token;

use logos::Logos;
use std::ops::Range;
use token::Token;

/// Byte range of a token in the source text
pub type Span = Range<usize>;

/// The lexer rejected the characters at `span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub span: Span,
}

/// Tokenize a source string and return a Vec of tokens, dropping anything invalid
pub fn lex(source: &str) -> Vec<Token> {
    Token::lexer(source)
        .filter_map(|t| t.ok())
        .collect()
}

/// Tokenize a source string keeping byte spans; stops at the first invalid input
pub fn lex_spanned(source: &str) -> Result<Vec<(Token, Span)>, LexError> {
    Token::lexer(source)
        .spanned()
        .map(|(t, span)| t.map(|t| (t, span.clone())).map_err(|_| LexError { span }))
        .collect()
}

#[cfg(test)]
mod tests;
