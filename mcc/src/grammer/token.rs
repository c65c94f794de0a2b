use crate::error::LexicalError;
use crate::symbols::VarType;
use arch::data::float_literal;
use std::fmt;
use strum::EnumDiscriminants;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Token { kind, line }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i32),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(TokenTag))]
pub enum TokenKind {
    // Double character tokens
    EqualEqual, // '=='

    // Single character tokens
    Equal,     // '='
    Semicolon, // ';'
    Comma,     // ','
    Period,    // '.'
    LParen,    // '('
    RParen,    // ')'
    LCurly,    // '{'
    RCurly,    // '}'
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'

    // Keywords
    KwVar,           // "var"
    KwType(VarType), // "int" | "float" | "string" | "char"
    KwRead,          // "read"
    KwPrint,         // "print"
    KwPrintln,       // "println"
    KwFor,           // "for"
    KwEnd,           // "end"
    KwSin,           // "sin"
    KwCos,           // "cos"
    KwTan,           // "tan"

    // Identifier
    Ident(String),

    // Literals
    Number(Number),
    Text(String),

    // Special
    Eof,
    Error(LexicalError),
}

pub fn keyword(lexeme: &str) -> Option<TokenKind> {
    match lexeme {
        "var" => Some(TokenKind::KwVar),
        "int" => Some(TokenKind::KwType(VarType::Int)),
        "float" => Some(TokenKind::KwType(VarType::Float)),
        "string" => Some(TokenKind::KwType(VarType::String)),
        "char" => Some(TokenKind::KwType(VarType::Char)),
        "read" => Some(TokenKind::KwRead),
        "print" => Some(TokenKind::KwPrint),
        "println" => Some(TokenKind::KwPrintln),
        "for" => Some(TokenKind::KwFor),
        "end" => Some(TokenKind::KwEnd),
        "sin" => Some(TokenKind::KwSin),
        "cos" => Some(TokenKind::KwCos),
        "tan" => Some(TokenKind::KwTan),
        _ => None,
    }
}

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenTag::EqualEqual => "'=='",
            TokenTag::Equal => "'='",
            TokenTag::Semicolon => "';'",
            TokenTag::Comma => "','",
            TokenTag::Period => "'.'",
            TokenTag::LParen => "'('",
            TokenTag::RParen => "')'",
            TokenTag::LCurly => "'{'",
            TokenTag::RCurly => "'}'",
            TokenTag::Plus => "'+'",
            TokenTag::Minus => "'-'",
            TokenTag::Star => "'*'",
            TokenTag::Slash => "'/'",
            TokenTag::KwVar => "'var'",
            TokenTag::KwType => "type",
            TokenTag::KwRead => "'read'",
            TokenTag::KwPrint => "'print'",
            TokenTag::KwPrintln => "'println'",
            TokenTag::KwFor => "'for'",
            TokenTag::KwEnd => "'end'",
            TokenTag::KwSin => "'sin'",
            TokenTag::KwCos => "'cos'",
            TokenTag::KwTan => "'tan'",
            TokenTag::Ident => "identifier",
            TokenTag::Number => "number",
            TokenTag::Text => "string literal",
            TokenTag::Eof => "end of input",
            TokenTag::Error => "invalid token",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::KwType(ty) => write!(f, "type '{ty}'"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Number(Number::Int(n)) => write!(f, "number {n}"),
            TokenKind::Number(Number::Float(n)) => write!(f, "number {}", float_literal(*n)),
            TokenKind::Text(text) => write!(f, "string \"{text}\""),
            kind => write!(f, "{}", TokenTag::from(kind)),
        }
    }
}
