use std::fmt::Display;

use crate::token::Token;

/// An error raised while evaluating. Carries the offending token so the
/// report can point at a source line. Raising one aborts the current
/// `interpret` call; effects produced before the error stay produced.
#[derive(Debug, PartialEq)]
pub enum RuntimeError {
    UndefinedVariable { name: Token },
    InvalidOperand { operator: Token, msg: String },
    DivisionByZero { operator: Token },
    ArityMismatch { paren: Token, expected: usize, actual: usize },
    NotCallable { paren: Token },
    Unsupported { token: Token, msg: String },
}

impl RuntimeError {
    pub fn invalid_operand(operator: &Token, msg: &str) -> Self {
        RuntimeError::InvalidOperand {
            operator: operator.clone(),
            msg: msg.to_owned(),
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name } => {
                write!(f, "[line {}] Undefined variable '{}'.", name.line, name.lexeme)
            }
            RuntimeError::InvalidOperand { operator, msg } => {
                write!(f, "[line {}] {}", operator.line, msg)
            }
            RuntimeError::DivisionByZero { operator } => {
                write!(f, "[line {}] Division by zero.", operator.line)
            }
            RuntimeError::ArityMismatch { paren, expected, actual } => {
                write!(
                    f,
                    "[line {}] Expected {} arguments but got {}.",
                    paren.line, expected, actual
                )
            }
            RuntimeError::NotCallable { paren } => {
                write!(f, "[line {}] Can only call functions.", paren.line)
            }
            RuntimeError::Unsupported { token, msg } => {
                write!(f, "[line {}] {}", token.line, msg)
            }
        }
    }
}
