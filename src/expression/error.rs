use std::fmt;

use super::parser::SyntaxError;

/// What went wrong while evaluating, named after the equivalent Python
/// exception so that messages read familiarly to people writing
/// expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    Syntax(SyntaxError),
    Name(String),
    Attribute { owner: &'static str, name: String },
    Type(String),
    Value(String),
    ZeroDivision(String),
    Overflow(String),
    Index(String),
}

impl Fault {
    pub fn kind(&self) -> &'static str {
        match self {
            Fault::Syntax(_) => "SyntaxError",
            Fault::Name(_) => "NameError",
            Fault::Attribute { .. } => "AttributeError",
            Fault::Type(_) => "TypeError",
            Fault::Value(_) => "ValueError",
            Fault::ZeroDivision(_) => "ZeroDivisionError",
            Fault::Overflow(_) => "OverflowError",
            Fault::Index(_) => "IndexError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Fault::Syntax(error) => format!("{} (at offset {})", error.message(), error.offset()),
            Fault::Name(name) => format!("name '{}' is not defined", name),
            Fault::Attribute { owner, name } => {
                format!("'{}' object has no attribute '{}'", owner, name)
            }
            Fault::Type(message)
            | Fault::Value(message)
            | Fault::ZeroDivision(message)
            | Fault::Overflow(message)
            | Fault::Index(message) => message.clone(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

/// An expression or stop-expression failed; carries the offending text so
/// the message can name it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub expr: String,
    pub cause: Fault,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The expression `{}` raised an exception: {}",
            self.expr, self.cause
        )
    }
}

impl std::error::Error for EvalError {}
