use super::token::{Token, TokenKind, TokenTag};
use crate::codegen::CodeGenerator;
use crate::error::Error;
use crate::options::Options;
use crate::symbols::SymbolTable;
use itertools::Itertools;
use std::iter::Peekable;

/// Recursive descent parser. Semantic actions run while parsing, so the
/// symbol table and code generator live here for the whole compilation.
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    line: usize,
    pub(super) symbols: SymbolTable,
    pub(super) gen: CodeGenerator,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I, options: &Options) -> Self {
        Parser {
            tokens: tokens.peekable(),
            line: 1,
            symbols: SymbolTable::new(),
            gen: CodeGenerator::new(options),
        }
    }

    /// Line of the most recently consumed token
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Peek : Watch next token without consuming it. Invalid tokens surface as lexical errors.
    pub fn peek(&mut self) -> Result<&Token, Error> {
        match self.tokens.peek() {
            Some(Token {
                kind: TokenKind::Error(err),
                line,
            }) => Err(err.clone().at(*line)),
            Some(token) => Ok(token),
            None => Err(Error::Syntax {
                expected: "more input".to_string(),
                found: TokenTag::Eof.to_string(),
                line: self.line,
            }),
        }
    }

    /// Next : Consume next token and return it
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.line = token.line;
        Some(token)
    }

    /// Peek and check next token is one of `tags`
    pub fn check_if(&mut self, tags: &[TokenTag]) -> bool {
        match self.tokens.peek() {
            Some(token) => tags.contains(&TokenTag::from(&token.kind)),
            None => false,
        }
    }

    /// Next token must be one of `tags`
    pub fn expect_tobe(&mut self, tags: &[TokenTag]) -> Result<Token, Error> {
        if self.check_if(tags) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        let expected = match tags {
            [tag] => tag.to_string(),
            tags => format!("one of {}", tags.iter().join(", ")),
        };
        Err(self.unexpected(&expected))
    }

    /// Error for the next token, which did not match `expected`
    pub fn unexpected(&mut self, expected: &str) -> Error {
        match self.peek() {
            Ok(token) => Error::Syntax {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                line: token.line,
            },
            Err(err) => err,
        }
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $($tag:ident)|+) => {
        $parser.check_if(&[$($crate::grammer::token::TokenTag::$tag),+])
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $($tag:ident)|+) => {
        $parser.expect_tobe(&[$($crate::grammer::token::TokenTag::$tag),+])
    };
}

/// Parse `{ element } terminal`, leaving the terminal unconsumed
#[macro_export]
macro_rules! repeat {
    ($parser:expr, $elem:expr, $terminal:ident) => {{
        let mut items = Vec::new();
        while !check!($parser, $terminal) {
            items.push($elem?);
        }
        items
    }};
}
