//! A small, restricted expression language in the manner of Python. Only
//! literals, the names bound by the caller, a fixed set of builtin
//! functions, and the math and random modules are reachable.

use tracing::debug;

mod builtins;
mod error;
mod interpreter;
mod parser;
mod value;

pub use error::{EvalError, Fault};
pub use interpreter::Interpreter;
pub use parser::{Expression, SyntaxError};
pub use value::{float_repr, parse_float, parse_integer, Value};

/// The variables visible to an expression.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: Vec<(&'static str, Value)>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// Add (or replace) a binding.
    pub fn bind(mut self, name: &'static str, value: Value) -> Environment {
        match self
            .bindings
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some((_, slot)) => *slot = value,
            None => self
                .bindings
                .push((name, value)),
        }
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value)
    }
}

/// An expression parsed once and evaluated many times.
#[derive(Debug, Clone)]
pub struct Program<'i> {
    text: &'i str,
    tree: Expression<'i>,
}

impl<'i> Program<'i> {
    pub fn compile(text: &'i str) -> Result<Program<'i>, EvalError> {
        let mut parser = parser::Parser::new();
        parser.initialize(text);

        match parser.read_program() {
            Ok(tree) => {
                debug!("Compiled expression {:?}", text);
                Ok(Program { text, tree })
            }
            Err(error) => Err(EvalError {
                expr: text.to_string(),
                cause: Fault::Syntax(error),
            }),
        }
    }

    pub fn text(&self) -> &'i str {
        self.text
    }

    pub fn evaluate(
        &self,
        interpreter: &mut Interpreter,
        environment: &Environment,
    ) -> Result<Value, EvalError> {
        interpreter
            .evaluate(&self.tree, environment)
            .map_err(|cause| EvalError {
                expr: self
                    .text
                    .to_string(),
                cause,
            })
    }
}
