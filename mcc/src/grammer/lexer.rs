use super::token::{keyword, Number, Token, TokenKind};
use crate::error::LexicalError;

/// Remove `/* ... */` comments, keeping the newlines they span so line numbers survive.
/// An unterminated `/*` is left in place.
pub fn strip_comments(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut rest = code;
    while let Some(start) = rest.find("/*") {
        let Some(len) = rest[start + 2..].find("*/") else {
            break;
        };
        out.push_str(&rest[..start]);
        let comment = &rest[start..start + 2 + len + 2];
        out.extend(comment.chars().filter(|&ch| ch == '\n'));
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    out
}

/// Produces tokens on demand, ending with a single [`TokenKind::Eof`].
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(code: &str) -> Self {
        Self {
            chars: strip_comments(code).chars().collect(),
            pos: 0,
            line: 1,
            finished: false,
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl Lexer {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.peek_nth(0)?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, cond: F) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0).filter(|&ch| cond(ch)) {
            lexeme.push(ch);
            self.consume();
        }
        lexeme
    }
}

// ----------------------------------------------------------------------------
// Scanner
// ----------------------------------------------------------------------------

impl Lexer {
    pub fn next_token(&mut self) -> Token {
        // 0. Skip whitespaces
        self.consume_while(char::is_whitespace);

        let line = self.line;
        let Some(ch0) = self.peek_nth(0) else {
            return Token::new(TokenKind::Eof, line);
        };

        // 1. Double character token
        if ch0 == '=' && self.peek_nth(1) == Some('=') {
            self.consume();
            self.consume();
            return Token::new(TokenKind::EqualEqual, line);
        }

        // 2. Single character token
        if let Some(kind) = single_char_token(ch0) {
            self.consume();
            return Token::new(kind, line);
        }

        // 3. Number literal
        if ch0.is_ascii_digit() {
            return Token::new(self.parse_number(), line);
        }

        // 4. String literal
        if ch0 == '"' {
            return Token::new(self.parse_text(), line);
        }

        // 5. Identifier or keyword
        if ch0.is_ascii_alphabetic() || ch0 == '_' {
            let lexeme = self.consume_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
            let kind = keyword(&lexeme).unwrap_or(TokenKind::Ident(lexeme));
            return Token::new(kind, line);
        }

        self.consume();
        Token::new(TokenKind::Error(LexicalError::UnexpectedChar(ch0)), line)
    }

    // Number: 42, 3.14. Integers must fit in 32 bits
    fn parse_number(&mut self) -> TokenKind {
        let lexeme = self.consume_while(|ch| ch.is_ascii_digit() || ch == '.');
        let number = if lexeme.contains('.') {
            lexeme.parse().ok().map(Number::Float)
        } else {
            lexeme.parse().ok().map(Number::Int)
        };
        match number {
            Some(number) => TokenKind::Number(number),
            None => TokenKind::Error(LexicalError::InvalidNumber(lexeme)),
        }
    }

    // Text: "hoge", no escapes
    fn parse_text(&mut self) -> TokenKind {
        self.consume();
        let lexeme = self.consume_while(|ch| ch != '"');
        match self.consume() {
            Some('"') => TokenKind::Text(lexeme),
            _ => TokenKind::Error(LexicalError::UnterminatedString),
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        _ => None,
    }
}
