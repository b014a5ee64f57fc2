//! Tree-walking evaluation of parsed expressions.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::builtins;
use super::error::Fault;
use super::parser::Expression;
use super::value::{self, Value};
use super::Environment;

/// Holds the state that persists between evaluations within one run, which
/// is only the random number generator.
#[derive(Debug)]
pub struct Interpreter {
    rng: StdRng,
}

impl Interpreter {
    pub fn new(seed: Option<u64>) -> Interpreter {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Interpreter { rng }
    }

    pub fn evaluate(
        &mut self,
        expression: &Expression<'_>,
        environment: &Environment,
    ) -> Result<Value, Fault> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Name(name) => self.lookup(name, environment),
            Expression::Unary(operator, operand) => {
                let operand = self.evaluate(operand, environment)?;
                value::unary(*operator, &operand)
            }
            Expression::Binary(operator, left, right) => {
                let left = self.evaluate(left, environment)?;
                let right = self.evaluate(right, environment)?;
                value::binary(*operator, &left, &right)
            }
            Expression::Compare(first, rest) => {
                let mut left = self.evaluate(first, environment)?;
                for (comparison, operand) in rest {
                    let right = self.evaluate(operand, environment)?;
                    if !value::compare(*comparison, &left, &right)? {
                        return Ok(Value::Boolean(false));
                    }
                    left = right;
                }
                Ok(Value::Boolean(true))
            }
            Expression::And(left, right) => {
                let left = self.evaluate(left, environment)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate(right, environment)
            }
            Expression::Or(left, right) => {
                let left = self.evaluate(left, environment)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate(right, environment)
            }
            Expression::Conditional { test, body, orelse } => {
                if self
                    .evaluate(test, environment)?
                    .is_truthy()
                {
                    self.evaluate(body, environment)
                } else {
                    self.evaluate(orelse, environment)
                }
            }
            Expression::Attribute(target, name) => match module_of(target, environment) {
                Some(module) => builtins::constant(module, name),
                None => {
                    let target = self.evaluate(target, environment)?;
                    Err(Fault::Attribute {
                        owner: target.type_name(),
                        name: name.to_string(),
                    })
                }
            },
            Expression::Call(function, arguments) => {
                self.call(function, arguments, environment)
            }
            Expression::Index(target, index) => {
                let target = self.evaluate(target, environment)?;
                let index = self.evaluate(index, environment)?;
                subscript(&target, &index)
            }
            Expression::Slice {
                target,
                lower,
                upper,
                step,
            } => {
                let target = self.evaluate(target, environment)?;
                let lower = self.bound(lower.as_deref(), environment)?;
                let upper = self.bound(upper.as_deref(), environment)?;
                let step = self.bound(step.as_deref(), environment)?;
                slice(&target, lower, upper, step)
            }
        }
    }

    fn lookup(&self, name: &str, environment: &Environment) -> Result<Value, Fault> {
        if let Some(value) = environment.lookup(name) {
            return Ok(value.clone());
        }
        if builtins::MODULES.contains(&name) {
            return Err(Fault::Type(format!(
                "module '{}' cannot be used as a value",
                name
            )));
        }
        Err(Fault::Name(name.to_string()))
    }

    fn bound(
        &mut self,
        expression: Option<&Expression<'_>>,
        environment: &Environment,
    ) -> Result<Option<i64>, Fault> {
        match expression {
            None => Ok(None),
            Some(expression) => {
                let value = self.evaluate(expression, environment)?;
                match value.as_integer() {
                    Some(n) => Ok(Some(n)),
                    None => Err(Fault::Type(
                        "slice indices must be integers".to_string(),
                    )),
                }
            }
        }
    }

    fn call(
        &mut self,
        function: &Expression<'_>,
        arguments: &[Expression<'_>],
        environment: &Environment,
    ) -> Result<Value, Fault> {
        // evaluate the callee's receiver before the arguments, as Python does
        enum Callee<'a> {
            Function(&'a str),
            Module(&'static str, &'a str),
            Method(Value, &'a str),
        }

        let callee = match function {
            Expression::Name(name) if environment.lookup(name).is_none() => {
                Callee::Function(name)
            }
            Expression::Attribute(target, name) => match module_of(target, environment) {
                Some(module) => Callee::Module(module, name),
                None => Callee::Method(self.evaluate(target, environment)?, name),
            },
            other => {
                let value = self.evaluate(other, environment)?;
                return Err(Fault::Type(format!(
                    "'{}' object is not callable",
                    value.type_name()
                )));
            }
        };

        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument, environment)?);
        }

        match callee {
            Callee::Function(name) => builtins::call_function(name, &values),
            Callee::Module(module, name) => {
                builtins::call_module(&mut self.rng, module, name, &values)
            }
            Callee::Method(receiver, name) => builtins::call_method(&receiver, name, &values),
        }
    }
}

/// A bare module name that hasn't been shadowed by a variable.
fn module_of(target: &Expression<'_>, environment: &Environment) -> Option<&'static str> {
    match target {
        Expression::Name(name) if environment.lookup(name).is_none() => {
            builtins::MODULES
                .iter()
                .copied()
                .find(|module| module == name)
        }
        _ => None,
    }
}

fn subscript(target: &Value, index: &Value) -> Result<Value, Fault> {
    let text = match target {
        Value::Text(text) => text,
        other => {
            return Err(Fault::Type(format!(
                "'{}' object is not subscriptable",
                other.type_name()
            )))
        }
    };
    let index = index
        .as_integer()
        .ok_or_else(|| {
            Fault::Type(format!(
                "string indices must be integers, not '{}'",
                index.type_name()
            ))
        })?;

    let chars: Vec<char> = text
        .chars()
        .collect();
    let length = chars.len() as i64;
    let position = if index < 0 { index + length } else { index };

    if position < 0 || position >= length {
        return Err(Fault::Index("string index out of range".to_string()));
    }
    Ok(Value::Text(chars[position as usize].to_string()))
}

fn slice(
    target: &Value,
    lower: Option<i64>,
    upper: Option<i64>,
    step: Option<i64>,
) -> Result<Value, Fault> {
    let text = match target {
        Value::Text(text) => text,
        other => {
            return Err(Fault::Type(format!(
                "'{}' object is not subscriptable",
                other.type_name()
            )))
        }
    };

    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(Fault::Value("slice step cannot be zero".to_string()));
    }

    let chars: Vec<char> = text
        .chars()
        .collect();
    let length = chars.len() as i64;

    // clamp into range the way sequence slicing does
    let adjust = |bound: i64, low: i64, high: i64| -> i64 {
        let bound = if bound < 0 { bound + length } else { bound };
        bound.clamp(low, high)
    };

    let mut result = String::new();
    if step > 0 {
        let start = lower.map_or(0, |n| adjust(n, 0, length));
        let stop = upper.map_or(length, |n| adjust(n, 0, length));
        let mut i = start;
        while i < stop {
            result.push(chars[i as usize]);
            i += step;
        }
    } else {
        let start = lower.map_or(length - 1, |n| adjust(n, -1, length - 1));
        let stop = upper.map_or(-1, |n| adjust(n, -1, length - 1));
        let mut i = start;
        while i > stop {
            result.push(chars[i as usize]);
            i += step;
        }
    }

    Ok(Value::Text(result))
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::expression::parser::Parser;

    fn run(source: &str, environment: &Environment) -> Result<Value, Fault> {
        let mut parser = Parser::new();
        parser.initialize(source);
        let tree = parser
            .read_program()
            .map_err(Fault::Syntax)?;
        let mut interpreter = Interpreter::new(Some(1));
        interpreter.evaluate(&tree, environment)
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn arithmetic_with_bindings() {
        let environment = Environment::new()
            .bind("_", Value::Integer(3))
            .bind("i", Value::Integer(2));

        assert_eq!(run("_ * 2 + i", &environment), Ok(Value::Integer(8)));
        assert_eq!(run("_ / 2", &environment), Ok(Value::Float(1.5)));
        assert_eq!(run("-_ // 2", &environment), Ok(Value::Integer(-2)));
        assert_eq!(run("-_ % 2", &environment), Ok(Value::Integer(1)));
        assert_eq!(run("2 ** -1", &environment), Ok(Value::Float(0.5)));
    }

    #[test]
    fn unknown_names() {
        let environment = Environment::new();
        assert_eq!(run("x + 1", &environment), Err(Fault::Name("x".to_string())));
        assert_eq!(
            run("__import__('os')", &environment),
            Err(Fault::Name("__import__".to_string()))
        );
    }

    #[test]
    fn short_circuit() {
        let environment = Environment::new();
        // the right side would raise if it were evaluated
        assert_eq!(run("0 and 1 / 0", &environment), Ok(Value::Integer(0)));
        assert_eq!(run("'a' or 1 / 0", &environment), Ok(text("a")));
        assert_eq!(run("'' or 5", &environment), Ok(Value::Integer(5)));
    }

    #[test]
    fn chained_comparisons() {
        let environment = Environment::new().bind("i", Value::Integer(3));
        assert_eq!(run("1 < i <= 3", &environment), Ok(Value::Boolean(true)));
        assert_eq!(run("1 < i < 3", &environment), Ok(Value::Boolean(false)));
        assert_eq!(run("'b' in 'abc'", &environment), Ok(Value::Boolean(true)));
        assert_eq!(run("'z' not in 'abc'", &environment), Ok(Value::Boolean(true)));
    }

    #[test]
    fn conditional_expression() {
        let environment = Environment::new().bind("i", Value::Integer(4));
        assert_eq!(
            run("'even' if i % 2 == 0 else 'odd'", &environment),
            Ok(text("even"))
        );
    }

    #[test]
    fn modules_and_methods() {
        let environment = Environment::new().bind("_", text("abc"));
        assert_eq!(run("_.upper()", &environment), Ok(text("ABC")));
        assert_eq!(run("math.floor(2.7)", &environment), Ok(Value::Integer(2)));
        assert_eq!(run("round(math.pi, 2)", &environment), Ok(Value::Float(3.14)));
        assert!(matches!(
            run("math", &environment),
            Err(Fault::Type(_))
        ));
        assert!(matches!(
            run("_.nonexistent()", &environment),
            Err(Fault::Attribute { .. })
        ));
    }

    #[test]
    fn shadowed_module_is_a_variable() {
        let environment = Environment::new().bind("math", Value::Integer(1));
        assert_eq!(run("math + 1", &environment), Ok(Value::Integer(2)));
    }

    #[test]
    fn indexing_and_slicing() {
        let environment = Environment::new().bind("_", text("hello"));
        assert_eq!(run("_[0]", &environment), Ok(text("h")));
        assert_eq!(run("_[-1]", &environment), Ok(text("o")));
        assert_eq!(run("_[1:3]", &environment), Ok(text("el")));
        assert_eq!(run("_[::-1]", &environment), Ok(text("olleh")));
        assert_eq!(run("_[-3:]", &environment), Ok(text("llo")));
        assert_eq!(run("_[10:]", &environment), Ok(text("")));
        assert!(matches!(run("_[5]", &environment), Err(Fault::Index(_))));
        assert!(matches!(run("_[::0]", &environment), Err(Fault::Value(_))));
    }

    #[test]
    fn seeded_randomness_repeats() {
        let environment = Environment::new();
        let source = "random.randint(1, 1000000)";
        assert_eq!(run(source, &environment), run(source, &environment));
    }
}
