use mcc::error::LexicalError;
use mcc::grammer::lexer::Lexer;
use mcc::grammer::token::{Number, TokenKind, TokenKind::*};
use mcc::symbols::VarType;

fn tokens(code: &str) -> Vec<TokenKind> {
    let tokens: Vec<_> = Lexer::new(code).collect();
    println!(" {code}");
    for (idx, token) in tokens.iter().enumerate() {
        println!("{:>2}: line {} {:?}", idx, token.line, token.kind);
    }
    tokens.into_iter().map(|token| token.kind).collect()
}

fn assert(code: &str, expect: TokenKind) {
    assert_eq!(tokens(code), vec![expect, Eof]);
}

macro_rules! case {
    ($name:ident, $code:expr, $expect:expr) => {
        #[test]
        fn $name() {
            assert($code, $expect);
        }
    };
}

// ---- Double-char operators ----
case!(equal_equal, "==", EqualEqual);

// ---- Single-char operators ----
case!(equal, "=", Equal);
case!(semicolon, ";", Semicolon);
case!(comma, ",", Comma);
case!(period, ".", Period);
case!(lparen, "(", LParen);
case!(rparen, ")", RParen);
case!(lcurly, "{", LCurly);
case!(rcurly, "}", RCurly);
case!(plus, "+", Plus);
case!(minus, "-", Minus);
case!(star, "*", Star);
case!(slash, "/", Slash);

// ---- Keywords ----
case!(kw_var, "var", KwVar);
case!(kw_int, "int", KwType(VarType::Int));
case!(kw_float, "float", KwType(VarType::Float));
case!(kw_string, "string", KwType(VarType::String));
case!(kw_char, "char", KwType(VarType::Char));
case!(kw_read, "read", KwRead);
case!(kw_print, "print", KwPrint);
case!(kw_println, "println", KwPrintln);
case!(kw_for, "for", KwFor);
case!(kw_end, "end", KwEnd);
case!(kw_sin, "sin", KwSin);
case!(kw_cos, "cos", KwCos);
case!(kw_tan, "tan", KwTan);

// ---- Identifiers and literals ----
case!(ident, "counter_1", Ident("counter_1".to_string()));
case!(ident_prefix_of_keyword, "ending", Ident("ending".to_string()));
case!(int, "42", Number(Number::Int(42)));
case!(float, "3.25", Number(Number::Float(3.25)));
case!(text, "\"x = \"", Text("x = ".to_string()));
case!(text_no_escapes, "\"a\\n\"", Text("a\\n".to_string()));

// ---- Errors ----
case!(unexpected_char, "$", Error(LexicalError::UnexpectedChar('$')));
case!(unterminated, "\"abc", Error(LexicalError::UnterminatedString));
case!(bad_number, "1.2.3", Error(LexicalError::InvalidNumber("1.2.3".to_string())));
case!(int_max, "2147483647", Number(Number::Int(i32::MAX)));
case!(int_overflow, "5000000000", Error(LexicalError::InvalidNumber("5000000000".to_string())));

#[test]
fn statement() {
    assert_eq!(
        tokens("var float x; x = sin(1.5) / 2;"),
        vec![
            KwVar,
            KwType(VarType::Float),
            Ident("x".to_string()),
            Semicolon,
            Ident("x".to_string()),
            Equal,
            KwSin,
            LParen,
            Number(Number::Float(1.5)),
            RParen,
            Slash,
            Number(Number::Int(2)),
            Semicolon,
            Eof,
        ]
    );
}

#[test]
fn end_of_program() {
    assert_eq!(tokens("end."), vec![KwEnd, Period, Eof]);
}

#[test]
fn block_comments_are_skipped() {
    assert_eq!(
        tokens("a /* b\n c */ d"),
        vec![Ident("a".to_string()), Ident("d".to_string()), Eof]
    );
}

#[test]
fn lines_survive_comments() {
    let lines: Vec<usize> = Lexer::new("a\n/* one\ntwo */\nb")
        .map(|token| token.line)
        .collect();
    assert_eq!(lines, vec![1, 4, 4]);
}

#[test]
fn scanning_continues_after_an_error() {
    assert_eq!(
        tokens("a # b"),
        vec![
            Ident("a".to_string()),
            Error(LexicalError::UnexpectedChar('#')),
            Ident("b".to_string()),
            Eof,
        ]
    );
}
