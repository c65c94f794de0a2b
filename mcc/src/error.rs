use crate::grammer::ast::{BinaryOp, MathFunc};
use crate::symbols::{RegClass, VarType};
use strum::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

/// Failure while scanning characters into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexicalError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),
}

/// Failure raised by the symbol table or the code generator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("variable '{0}' already declared")]
    AlreadyDeclared(String),

    #[error("variable '{0}' not declared")]
    NotDeclared(String),

    #[error("no {0} registers left")]
    RegistersExhausted(RegClass),

    #[error("cannot convert {from} to {to}")]
    InvalidConversion { from: VarType, to: VarType },

    #[error("function {func} requires a float argument, found {found}")]
    MathArgument { func: MathFunc, found: VarType },

    #[error("operator '{op}' is not supported for {ty}")]
    UnsupportedOperation { op: BinaryOp, ty: VarType },

    #[error("loop variable '{name}' must be int or float, found {ty}")]
    LoopVariable { name: String, ty: VarType },
}

/// Compilation error. The first one encountered aborts the compilation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("lexical error at line {line}: {source}")]
    Lexical { source: LexicalError, line: usize },

    #[error("syntax error at line {line}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("semantic error at line {line}: {source}")]
    Semantic { source: SemanticError, line: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lexical { .. } => ErrorKind::Lexical,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Semantic { .. } => ErrorKind::Semantic,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Error::Lexical { line, .. } | Error::Syntax { line, .. } | Error::Semantic { line, .. } => {
                *line
            }
        }
    }
}

impl LexicalError {
    pub fn at(self, line: usize) -> Error {
        Error::Lexical { source: self, line }
    }
}

impl SemanticError {
    pub fn at(self, line: usize) -> Error {
        Error::Semantic { source: self, line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_kind_and_line() {
        let err = LexicalError::UnexpectedChar('$').at(3);
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.line(), 3);
        assert_eq!(
            err.to_string(),
            "lexical error at line 3: unexpected character '$'"
        );

        let err = SemanticError::InvalidConversion {
            from: VarType::String,
            to: VarType::Int,
        }
        .at(7);
        assert_eq!(err.kind(), ErrorKind::Semantic);
        assert_eq!(
            err.to_string(),
            "semantic error at line 7: cannot convert string to int"
        );
    }
}
