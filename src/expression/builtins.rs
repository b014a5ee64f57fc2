//! The fixed set of functions, modules, and methods expressions may call.
//! Nothing here reaches outside the values passed in.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::Rng;

use super::error::Fault;
use super::parser::{BinaryOperator, Comparison};
use super::value::{self, parse_float, parse_integer, Value, MAXIMUM_TEXT};

pub const MODULES: &[&str] = &["math", "random"];

fn arity(name: &str, arguments: &[Value], minimum: usize, maximum: usize) -> Result<(), Fault> {
    let given = arguments.len();
    if given >= minimum && given <= maximum {
        return Ok(());
    }

    let expected = if minimum == maximum {
        format!("exactly {}", minimum)
    } else if given < minimum {
        format!("at least {}", minimum)
    } else {
        format!("at most {}", maximum)
    };
    Err(Fault::Type(format!(
        "{}() takes {} argument{} ({} given)",
        name,
        expected,
        if minimum == maximum && minimum == 1 { "" } else { "s" },
        given
    )))
}

fn real(name: &str, value: &Value) -> Result<f64, Fault> {
    value
        .as_real()
        .ok_or_else(|| {
            Fault::Type(format!(
                "{}() must be a real number, not {}",
                name,
                value.type_name()
            ))
        })
}

fn integer(name: &str, value: &Value) -> Result<i64, Fault> {
    value
        .as_integer()
        .ok_or_else(|| {
            Fault::Type(format!(
                "'{}' object cannot be interpreted as an integer in {}()",
                value.type_name(),
                name
            ))
        })
}

fn text<'v>(name: &str, value: &'v Value) -> Result<&'v str, Fault> {
    match value {
        Value::Text(text) => Ok(text),
        other => Err(Fault::Type(format!(
            "{}() argument must be str, not {}",
            name,
            other.type_name()
        ))),
    }
}

fn domain() -> Fault {
    Fault::Value("math domain error".to_string())
}

fn range() -> Fault {
    Fault::Overflow("math range error".to_string())
}

/// Convert a float to an integer, as int() does.
fn truncate(x: f64) -> Result<i64, Fault> {
    if x.is_nan() {
        return Err(Fault::Value("cannot convert float NaN to integer".to_string()));
    }
    if x.is_infinite() || x >= 9.223372036854775807e18 || x < -9.223372036854775808e18 {
        return Err(Fault::Overflow("cannot convert float infinity to integer".to_string()));
    }
    Ok(x.trunc() as i64)
}

fn radix(prefix: &str, n: i64, digits: fn(u64) -> String) -> Value {
    let sign = if n < 0 { "-" } else { "" };
    Value::Text(format!("{}{}{}", sign, prefix, digits(n.unsigned_abs())))
}

pub fn call_function(name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    match name {
        "abs" => {
            arity(name, arguments, 1, 1)?;
            match &arguments[0] {
                Value::Float(x) => Ok(Value::Float(x.abs())),
                other => integer(name, other)?
                    .checked_abs()
                    .map(Value::Integer)
                    .ok_or_else(|| Fault::Overflow("integer result too large".to_string())),
            }
        }
        "min" | "max" => extreme(name, arguments),
        "round" => {
            arity(name, arguments, 1, 2)?;
            let x = real(name, &arguments[0])?;
            match arguments.get(1) {
                None => match &arguments[0] {
                    Value::Float(_) => truncate(x.round_ties_even()).map(Value::Integer),
                    other => Ok(Value::Integer(integer(name, other)?)),
                },
                Some(digits) => {
                    let digits = integer(name, digits)?;
                    let scale = 10f64.powi(digits.clamp(-308, 308) as i32);
                    let rounded = (x * scale).round_ties_even() / scale;
                    match &arguments[0] {
                        Value::Float(_) => Ok(Value::Float(rounded)),
                        _ => truncate(rounded).map(Value::Integer),
                    }
                }
            }
        }
        "int" => {
            arity(name, arguments, 0, 1)?;
            match arguments.first() {
                None => Ok(Value::Integer(0)),
                Some(Value::Float(x)) => truncate(*x).map(Value::Integer),
                Some(Value::Text(text)) => parse_integer(text)
                    .map(Value::Integer)
                    .ok_or_else(|| {
                        Fault::Value(format!(
                            "invalid literal for int() with base 10: '{}'",
                            text
                        ))
                    }),
                Some(other) => Ok(Value::Integer(integer(name, other)?)),
            }
        }
        "float" => {
            arity(name, arguments, 0, 1)?;
            match arguments.first() {
                None => Ok(Value::Float(0.0)),
                Some(Value::Text(text)) => parse_float(text)
                    .map(Value::Float)
                    .ok_or_else(|| {
                        Fault::Value(format!("could not convert string to float: '{}'", text))
                    }),
                Some(other) => Ok(Value::Float(real(name, other)?)),
            }
        }
        "str" => {
            arity(name, arguments, 0, 1)?;
            Ok(Value::Text(
                arguments
                    .first()
                    .map(Value::to_string)
                    .unwrap_or_default(),
            ))
        }
        "bool" => {
            arity(name, arguments, 0, 1)?;
            Ok(Value::Boolean(
                arguments
                    .first()
                    .map_or(false, Value::is_truthy),
            ))
        }
        "len" => {
            arity(name, arguments, 1, 1)?;
            match &arguments[0] {
                Value::Text(text) => Ok(Value::Integer(
                    text.chars()
                        .count() as i64,
                )),
                other => Err(Fault::Type(format!(
                    "object of type '{}' has no len()",
                    other.type_name()
                ))),
            }
        }
        "chr" => {
            arity(name, arguments, 1, 1)?;
            let code = integer(name, &arguments[0])?;
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .map(|c| Value::Text(c.to_string()))
                .ok_or_else(|| Fault::Value("chr() arg not in range(0x110000)".to_string()))
        }
        "ord" => {
            arity(name, arguments, 1, 1)?;
            let text = text(name, &arguments[0])?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Integer(c as i64)),
                _ => Err(Fault::Type(format!(
                    "ord() expected a character, but string of length {} found",
                    text.chars()
                        .count()
                ))),
            }
        }
        "hex" => {
            arity(name, arguments, 1, 1)?;
            Ok(radix("0x", integer(name, &arguments[0])?, |n| format!("{:x}", n)))
        }
        "oct" => {
            arity(name, arguments, 1, 1)?;
            Ok(radix("0o", integer(name, &arguments[0])?, |n| format!("{:o}", n)))
        }
        "bin" => {
            arity(name, arguments, 1, 1)?;
            Ok(radix("0b", integer(name, &arguments[0])?, |n| format!("{:b}", n)))
        }
        "pow" => {
            arity(name, arguments, 2, 2)?;
            value::binary(BinaryOperator::Power, &arguments[0], &arguments[1])
        }
        _ if MODULES.contains(&name) => Err(Fault::Type(format!(
            "'module' object is not callable: {}",
            name
        ))),
        _ => Err(Fault::Name(name.to_string())),
    }
}

fn extreme(name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    if arguments.is_empty() {
        return Err(Fault::Type(format!(
            "{} expected at least 1 argument, got 0",
            name
        )));
    }

    // a single string is treated as the sequence of its characters
    let candidates: Vec<Value> = match arguments {
        [Value::Text(text)] => text
            .chars()
            .map(|c| Value::Text(c.to_string()))
            .collect(),
        [other] => {
            return Err(Fault::Type(format!(
                "'{}' object is not iterable",
                other.type_name()
            )))
        }
        _ => arguments.to_vec(),
    };

    let wanted = if name == "min" { Ordering::Less } else { Ordering::Greater };
    let comparison = if name == "min" { Comparison::Less } else { Comparison::Greater };

    let mut best: Option<Value> = None;
    for candidate in candidates {
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if value::ordering(comparison, &candidate, &current)? == Some(wanted) {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }

    best.ok_or_else(|| Fault::Value(format!("{}() arg is an empty sequence", name)))
}

pub fn constant(module: &str, name: &str) -> Result<Value, Fault> {
    match (module, name) {
        ("math", "pi") => Ok(Value::Float(std::f64::consts::PI)),
        ("math", "e") => Ok(Value::Float(std::f64::consts::E)),
        ("math", "tau") => Ok(Value::Float(std::f64::consts::TAU)),
        ("math", "inf") => Ok(Value::Float(f64::INFINITY)),
        ("math", "nan") => Ok(Value::Float(f64::NAN)),
        _ => Err(Fault::Attribute {
            owner: "module",
            name: format!("{}.{}", module, name),
        }),
    }
}

pub fn call_module(
    rng: &mut StdRng,
    module: &str,
    name: &str,
    arguments: &[Value],
) -> Result<Value, Fault> {
    match module {
        "math" => call_math(name, arguments),
        "random" => call_random(rng, name, arguments),
        _ => Err(Fault::Name(module.to_string())),
    }
}

fn call_math(name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    let unary = |f: fn(f64) -> f64| -> Result<Value, Fault> {
        arity(name, arguments, 1, 1)?;
        let x = real(name, &arguments[0])?;
        let result = f(x);
        if result.is_nan() && !x.is_nan() {
            return Err(domain());
        }
        if result.is_infinite() && x.is_finite() {
            return Err(range());
        }
        Ok(Value::Float(result))
    };

    match name {
        "sqrt" => unary(f64::sqrt),
        "exp" => unary(f64::exp),
        "log10" => unary(f64::log10),
        "log2" => unary(f64::log2),
        "sin" => unary(f64::sin),
        "cos" => unary(f64::cos),
        "tan" => unary(f64::tan),
        "asin" => unary(f64::asin),
        "acos" => unary(f64::acos),
        "atan" => unary(f64::atan),
        "fabs" => unary(f64::abs),
        "degrees" => unary(f64::to_degrees),
        "radians" => unary(f64::to_radians),
        "floor" | "ceil" | "trunc" => {
            arity(name, arguments, 1, 1)?;
            match &arguments[0] {
                Value::Float(x) => {
                    let rounded = match name {
                        "floor" => x.floor(),
                        "ceil" => x.ceil(),
                        _ => x.trunc(),
                    };
                    truncate(rounded).map(Value::Integer)
                }
                other => Ok(Value::Integer(integer(name, other)?)),
            }
        }
        "log" => {
            arity(name, arguments, 1, 2)?;
            let x = real(name, &arguments[0])?;
            if x <= 0.0 {
                return Err(domain());
            }
            match arguments.get(1) {
                None => Ok(Value::Float(x.ln())),
                Some(base) => {
                    let base = real(name, base)?;
                    if base <= 0.0 || base == 1.0 {
                        return Err(domain());
                    }
                    Ok(Value::Float(x.ln() / base.ln()))
                }
            }
        }
        "pow" | "atan2" | "hypot" => {
            arity(name, arguments, 2, 2)?;
            let x = real(name, &arguments[0])?;
            let y = real(name, &arguments[1])?;
            let result = match name {
                "pow" => x.powf(y),
                "atan2" => x.atan2(y),
                _ => x.hypot(y),
            };
            if result.is_nan() && !x.is_nan() && !y.is_nan() {
                return Err(domain());
            }
            Ok(Value::Float(result))
        }
        "factorial" => {
            arity(name, arguments, 1, 1)?;
            let n = integer(name, &arguments[0])?;
            if n < 0 {
                return Err(Fault::Value(
                    "factorial() not defined for negative values".to_string(),
                ));
            }
            (1..=n)
                .try_fold(1i64, |product, k| product.checked_mul(k))
                .map(Value::Integer)
                .ok_or_else(|| Fault::Overflow("integer result too large".to_string()))
        }
        "gcd" => {
            arity(name, arguments, 2, 2)?;
            let mut a = integer(name, &arguments[0])?.unsigned_abs();
            let mut b = integer(name, &arguments[1])?.unsigned_abs();
            while b != 0 {
                (a, b) = (b, a % b);
            }
            i64::try_from(a)
                .map(Value::Integer)
                .map_err(|_| Fault::Overflow("integer result too large".to_string()))
        }
        _ => {
            let value = constant("math", name)?;
            Err(Fault::Type(format!(
                "'{}' object is not callable",
                value.type_name()
            )))
        }
    }
}

fn call_random(rng: &mut StdRng, name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    match name {
        "random" => {
            arity(name, arguments, 0, 0)?;
            Ok(Value::Float(rng.gen::<f64>()))
        }
        "uniform" => {
            arity(name, arguments, 2, 2)?;
            let a = real(name, &arguments[0])?;
            let b = real(name, &arguments[1])?;
            Ok(Value::Float(a + (b - a) * rng.gen::<f64>()))
        }
        "randint" => {
            arity(name, arguments, 2, 2)?;
            let a = integer(name, &arguments[0])?;
            let b = integer(name, &arguments[1])?;
            if a > b {
                return Err(Fault::Value(format!(
                    "empty range for randint() ({}, {})",
                    a, b
                )));
            }
            Ok(Value::Integer(rng.gen_range(a..=b)))
        }
        "randrange" => {
            arity(name, arguments, 1, 2)?;
            let (start, stop) = match arguments {
                [stop] => (0, integer(name, stop)?),
                [start, stop] => (integer(name, start)?, integer(name, stop)?),
                _ => return Err(Fault::Type("randrange() expected 1 or 2 arguments".to_string())),
            };
            if start >= stop {
                return Err(Fault::Value(format!(
                    "empty range for randrange() ({}, {})",
                    start, stop
                )));
            }
            Ok(Value::Integer(rng.gen_range(start..stop)))
        }
        "choice" => {
            arity(name, arguments, 1, 1)?;
            let chars: Vec<char> = text(name, &arguments[0])?
                .chars()
                .collect();
            if chars.is_empty() {
                return Err(Fault::Index("cannot choose from an empty sequence".to_string()));
            }
            let i = rng.gen_range(0..chars.len());
            Ok(Value::Text(chars[i].to_string()))
        }
        _ => Err(Fault::Attribute {
            owner: "module",
            name: format!("random.{}", name),
        }),
    }
}

pub fn call_method(receiver: &Value, name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    match receiver {
        Value::Text(text) => call_text_method(text, name, arguments),
        Value::Float(x) if name == "is_integer" => {
            arity(name, arguments, 0, 0)?;
            Ok(Value::Boolean(x.is_finite() && x.fract() == 0.0))
        }
        Value::Integer(n) if name == "bit_length" => {
            arity(name, arguments, 0, 0)?;
            Ok(Value::Integer((64 - n.unsigned_abs().leading_zeros()) as i64))
        }
        other => Err(Fault::Attribute {
            owner: other.type_name(),
            name: name.to_string(),
        }),
    }
}

fn width(name: &str, value: &Value) -> Result<usize, Fault> {
    let n = integer(name, value)?.max(0) as usize;
    if n > MAXIMUM_TEXT {
        return Err(Fault::Overflow("padded string is too long".to_string()));
    }
    Ok(n)
}

fn fill(name: &str, arguments: &[Value], position: usize) -> Result<char, Fault> {
    match arguments.get(position) {
        None => Ok(' '),
        Some(value) => {
            let text = text(name, value)?;
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(Fault::Type(
                    "The fill character must be exactly one character long".to_string(),
                )),
            }
        }
    }
}

fn strip_set(name: &str, arguments: &[Value]) -> Result<Option<Vec<char>>, Fault> {
    arity(name, arguments, 0, 1)?;
    match arguments.first() {
        None => Ok(None),
        Some(value) => Ok(Some(
            text(name, value)?
                .chars()
                .collect(),
        )),
    }
}

fn title(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if previous_cased {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    result
}

fn call_text_method(text: &str, name: &str, arguments: &[Value]) -> Result<Value, Fault> {
    let length = text
        .chars()
        .count();

    let result = match name {
        "upper" => {
            arity(name, arguments, 0, 0)?;
            Value::Text(text.to_uppercase())
        }
        "lower" => {
            arity(name, arguments, 0, 0)?;
            Value::Text(text.to_lowercase())
        }
        "title" => {
            arity(name, arguments, 0, 0)?;
            Value::Text(title(text))
        }
        "capitalize" => {
            arity(name, arguments, 0, 0)?;
            let mut chars = text.chars();
            let capitalized = match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(
                        chars
                            .as_str()
                            .to_lowercase()
                            .chars(),
                    )
                    .collect(),
                None => String::new(),
            };
            Value::Text(capitalized)
        }
        "swapcase" => {
            arity(name, arguments, 0, 0)?;
            let swapped = text
                .chars()
                .flat_map(|c| {
                    if c.is_uppercase() {
                        c.to_lowercase()
                            .collect::<Vec<_>>()
                    } else {
                        c.to_uppercase()
                            .collect::<Vec<_>>()
                    }
                })
                .collect();
            Value::Text(swapped)
        }
        "strip" | "lstrip" | "rstrip" => {
            let set = strip_set(name, arguments)?;
            let matches = |c: char| match &set {
                None => c.is_whitespace(),
                Some(set) => set.contains(&c),
            };
            let stripped = match name {
                "strip" => text.trim_matches(matches),
                "lstrip" => text.trim_start_matches(matches),
                _ => text.trim_end_matches(matches),
            };
            Value::Text(stripped.to_string())
        }
        "zfill" => {
            arity(name, arguments, 1, 1)?;
            let target = width(name, &arguments[0])?;
            if target <= length {
                Value::Text(text.to_string())
            } else {
                let zeros = "0".repeat(target - length);
                let filled = match text.chars().next() {
                    Some(sign @ ('+' | '-')) => format!("{}{}{}", sign, zeros, &text[1..]),
                    _ => format!("{}{}", zeros, text),
                };
                Value::Text(filled)
            }
        }
        "center" | "ljust" | "rjust" => {
            arity(name, arguments, 1, 2)?;
            let target = width(name, &arguments[0])?;
            let c = fill(name, arguments, 1)?;
            if target <= length {
                Value::Text(text.to_string())
            } else {
                let margin = target - length;
                let left = match name {
                    "ljust" => 0,
                    "rjust" => margin,
                    _ => margin / 2 + (margin & target & 1),
                };
                let mut padded = String::with_capacity(target);
                padded.extend(std::iter::repeat(c).take(left));
                padded.push_str(text);
                padded.extend(std::iter::repeat(c).take(margin - left));
                Value::Text(padded)
            }
        }
        "replace" => {
            arity(name, arguments, 2, 3)?;
            let old = self::text(name, &arguments[0])?;
            let new = self::text(name, &arguments[1])?;
            let count = match arguments.get(2) {
                Some(count) => usize::try_from(integer(name, count)?).ok(),
                None => None,
            };

            // an empty pattern matches between every character
            let matches = if old.is_empty() {
                text.chars()
                    .count()
                    + 1
            } else {
                text.matches(old)
                    .count()
            };
            let matches = count.map_or(matches, |count| matches.min(count));
            if text
                .len()
                .saturating_add(matches.saturating_mul(new.len()))
                > MAXIMUM_TEXT
            {
                return Err(Fault::Overflow("replaced string is too long".to_string()));
            }

            match count {
                None => Value::Text(text.replace(old, new)),
                Some(count) => Value::Text(text.replacen(old, new, count)),
            }
        }
        "startswith" | "endswith" => {
            arity(name, arguments, 1, 1)?;
            let affix = self::text(name, &arguments[0])?;
            Value::Boolean(if name == "startswith" {
                text.starts_with(affix)
            } else {
                text.ends_with(affix)
            })
        }
        "count" => {
            arity(name, arguments, 1, 1)?;
            let needle = self::text(name, &arguments[0])?;
            let count = if needle.is_empty() {
                length + 1
            } else {
                text.matches(needle)
                    .count()
            };
            Value::Integer(count as i64)
        }
        "find" => {
            arity(name, arguments, 1, 1)?;
            let needle = self::text(name, &arguments[0])?;
            let position = text
                .find(needle)
                .map_or(-1, |i| {
                    text[..i]
                        .chars()
                        .count() as i64
                });
            Value::Integer(position)
        }
        "isdigit" | "isalpha" | "isupper" | "islower" => {
            arity(name, arguments, 0, 0)?;
            let answer = match name {
                "isdigit" => !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()),
                "isalpha" => !text.is_empty() && text.chars().all(char::is_alphabetic),
                "isupper" => {
                    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
                }
                _ => text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase),
            };
            Value::Boolean(answer)
        }
        _ => {
            return Err(Fault::Attribute {
                owner: "str",
                name: name.to_string(),
            })
        }
    };

    Ok(result)
}
