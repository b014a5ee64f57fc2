//! Values manipulated by expressions, and the arithmetic between them

use std::cmp::Ordering;
use std::fmt;

use super::error::Fault;
use super::parser::{BinaryOperator, Comparison, UnaryOperator};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

// Upper bound on strings built by repetition or padding, in bytes.
pub(crate) const MAXIMUM_TEXT: usize = 1 << 24;

// Booleans take part in arithmetic as 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Integral(i64),
    Real(f64),
}

impl Numeric {
    fn real(self) -> f64 {
        match self {
            Numeric::Integral(n) => n as f64,
            Numeric::Real(x) => x,
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Text(text) => !text.is_empty(),
        }
    }

    /// Like Display, but strings are quoted.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(text) => format!("'{}'", text.replace('\'', "\\'")),
            _ => self.to_string(),
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            Value::Boolean(b) => Some(Numeric::Integral(*b as i64)),
            Value::Integer(n) => Some(Numeric::Integral(*n)),
            Value::Float(x) => Some(Numeric::Real(*x)),
            Value::Text(_) => None,
        }
    }

    pub(crate) fn as_integer(&self) -> Option<i64> {
        match self.numeric()? {
            Numeric::Integral(n) => Some(n),
            Numeric::Real(_) => None,
        }
    }

    pub(crate) fn as_real(&self) -> Option<f64> {
        self.numeric()
            .map(Numeric::real)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&float_repr(*x)),
            Value::Text(text) => f.write_str(text),
        }
    }
}

/// The shortest representation that round-trips, switching to scientific
/// notation for exponents below -4 or from 16 upwards.
pub fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let (digits, exponent) = shortest_digits(x.abs());
    let sign = if x < 0.0 { "-" } else { "" };

    if (-4..16).contains(&exponent) {
        let (whole, fraction) = if exponent >= 0 {
            let point = exponent as usize + 1;
            if digits.len() <= point {
                (format!("{}{}", digits, "0".repeat(point - digits.len())), "0".to_string())
            } else {
                (digits[..point].to_string(), digits[point..].to_string())
            }
        } else {
            let zeros = (-exponent - 1) as usize;
            ("0".to_string(), format!("{}{}", "0".repeat(zeros), digits))
        };
        format!("{}{}.{}", sign, whole, fraction)
    } else {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        format!("{}{}e{}{:02}", sign, mantissa, if exponent < 0 { '-' } else { '+' }, exponent.abs())
    }
}

// Significant decimal digits (no point) and the decimal exponent of the
// first one.
fn shortest_digits(x: f64) -> (String, i32) {
    let scientific = format!("{:e}", x);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));

    let digits = mantissa
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let exponent = exponent
        .parse()
        .unwrap_or(0);

    (digits, exponent)
}

/// Integer conversion of text, tolerating surrounding whitespace, an
/// explicit sign and `_` digit separators.
pub fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let re = regex!(r"^[+-]?[0-9]+(?:_[0-9]+)*$");
    if !re.is_match(trimmed) {
        return None;
    }
    trimmed
        .replace('_', "")
        .parse()
        .ok()
}

pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let re = regex!(r"^[+-]?(?:(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|(?i:inf|infinity|nan))$");
    if !re.is_match(trimmed) {
        return None;
    }
    trimmed
        .parse()
        .ok()
}

fn unsupported(operator: &str, left: &Value, right: &Value) -> Fault {
    Fault::Type(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        operator,
        left.type_name(),
        right.type_name()
    ))
}

fn overflow() -> Fault {
    Fault::Overflow("integer result too large".to_string())
}

pub fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, Fault> {
    use BinaryOperator::*;

    match (operator, left, right) {
        (Add, Value::Text(a), Value::Text(b)) => {
            if a.len() + b.len() > MAXIMUM_TEXT {
                return Err(Fault::Overflow("concatenated string is too long".to_string()));
            }
            return Ok(Value::Text(format!("{}{}", a, b)));
        }
        (Multiply, Value::Text(text), other) | (Multiply, other, Value::Text(text)) => {
            return match other.as_integer() {
                Some(count) => {
                    let count = count.max(0) as usize;
                    if text
                        .len()
                        .saturating_mul(count)
                        > MAXIMUM_TEXT
                    {
                        return Err(Fault::Overflow("repeated string is too long".to_string()));
                    }
                    Ok(Value::Text(text.repeat(count)))
                }
                _ => Err(Fault::Type(format!(
                    "can't multiply sequence by non-int of type '{}'",
                    other.type_name()
                ))),
            };
        }
        (BitOr | BitXor | BitAnd | ShiftLeft | ShiftRight, _, _) => {
            return bitwise(operator, left, right);
        }
        _ => {}
    }

    let (Some(a), Some(b)) = (left.numeric(), right.numeric()) else {
        return Err(unsupported(operator.symbol(), left, right));
    };

    match operator {
        Add => arithmetic(a, b, i64::checked_add, |x, y| x + y),
        Subtract => arithmetic(a, b, i64::checked_sub, |x, y| x - y),
        Multiply => arithmetic(a, b, i64::checked_mul, |x, y| x * y),
        Divide => {
            let (x, y) = (a.real(), b.real());
            if y == 0.0 {
                return Err(Fault::ZeroDivision("division by zero".to_string()));
            }
            Ok(Value::Float(x / y))
        }
        FloorDivide => match (a, b) {
            (Numeric::Integral(_), Numeric::Integral(0)) => Err(Fault::ZeroDivision(
                "integer division or modulo by zero".to_string(),
            )),
            (Numeric::Integral(x), Numeric::Integral(y)) => {
                let quotient = x
                    .checked_div(y)
                    .ok_or_else(overflow)?;
                let remainder = x
                    .checked_rem(y)
                    .ok_or_else(overflow)?;
                if remainder != 0 && (remainder < 0) != (y < 0) {
                    Ok(Value::Integer(quotient - 1))
                } else {
                    Ok(Value::Integer(quotient))
                }
            }
            _ => {
                let (x, y) = (a.real(), b.real());
                if y == 0.0 {
                    return Err(Fault::ZeroDivision("float floor division by zero".to_string()));
                }
                Ok(Value::Float((x / y).floor()))
            }
        },
        Modulo => match (a, b) {
            (Numeric::Integral(_), Numeric::Integral(0)) => Err(Fault::ZeroDivision(
                "integer division or modulo by zero".to_string(),
            )),
            (Numeric::Integral(x), Numeric::Integral(y)) => {
                let remainder = x
                    .checked_rem(y)
                    .ok_or_else(overflow)?;
                if remainder != 0 && (remainder < 0) != (y < 0) {
                    Ok(Value::Integer(remainder + y))
                } else {
                    Ok(Value::Integer(remainder))
                }
            }
            _ => {
                let (x, y) = (a.real(), b.real());
                if y == 0.0 {
                    return Err(Fault::ZeroDivision("float modulo".to_string()));
                }
                let remainder = x % y;
                if remainder != 0.0 && (remainder < 0.0) != (y < 0.0) {
                    Ok(Value::Float(remainder + y))
                } else {
                    Ok(Value::Float(remainder))
                }
            }
        },
        Power => power(a, b),
        BitOr | BitXor | BitAnd | ShiftLeft | ShiftRight => bitwise(operator, left, right),
    }
}

fn arithmetic(
    a: Numeric,
    b: Numeric,
    integral: fn(i64, i64) -> Option<i64>,
    real: fn(f64, f64) -> f64,
) -> Result<Value, Fault> {
    match (a, b) {
        (Numeric::Integral(x), Numeric::Integral(y)) => integral(x, y)
            .map(Value::Integer)
            .ok_or_else(overflow),
        _ => Ok(Value::Float(real(a.real(), b.real()))),
    }
}

fn power(a: Numeric, b: Numeric) -> Result<Value, Fault> {
    if let (Numeric::Integral(x), Numeric::Integral(y)) = (a, b) {
        if y >= 0 {
            let exponent = u32::try_from(y).map_err(|_| overflow())?;
            return x
                .checked_pow(exponent)
                .map(Value::Integer)
                .ok_or_else(overflow);
        }
    }

    let (x, y) = (a.real(), b.real());
    if x == 0.0 && y < 0.0 {
        return Err(Fault::ZeroDivision(
            "0.0 cannot be raised to a negative power".to_string(),
        ));
    }

    let result = x.powf(y);
    if result.is_nan() && !x.is_nan() && !y.is_nan() {
        return Err(Fault::Value("math domain error".to_string()));
    }
    if result.is_infinite() && x.is_finite() && y.is_finite() {
        return Err(Fault::Overflow("numerical result out of range".to_string()));
    }
    Ok(Value::Float(result))
}

fn bitwise(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, Fault> {
    use BinaryOperator::*;

    if let (Value::Boolean(a), Value::Boolean(b)) = (left, right) {
        match operator {
            BitOr => return Ok(Value::Boolean(a | b)),
            BitXor => return Ok(Value::Boolean(a ^ b)),
            BitAnd => return Ok(Value::Boolean(a & b)),
            _ => {}
        }
    }

    let (Some(x), Some(y)) = (left.as_integer(), right.as_integer()) else {
        return Err(unsupported(operator.symbol(), left, right));
    };

    match operator {
        BitOr => Ok(Value::Integer(x | y)),
        BitXor => Ok(Value::Integer(x ^ y)),
        BitAnd => Ok(Value::Integer(x & y)),
        ShiftLeft | ShiftRight if y < 0 => Err(Fault::Value("negative shift count".to_string())),
        ShiftLeft => {
            let shifted = if y >= 63 { None } else { x.checked_mul(1 << y) };
            match shifted {
                Some(n) => Ok(Value::Integer(n)),
                None if x == 0 => Ok(Value::Integer(0)),
                None => Err(overflow()),
            }
        }
        ShiftRight => Ok(Value::Integer(x >> y.min(63))),
        _ => Err(unsupported(operator.symbol(), left, right)),
    }
}

pub fn unary(operator: UnaryOperator, operand: &Value) -> Result<Value, Fault> {
    let bad = || {
        Fault::Type(format!(
            "bad operand type for unary {}: '{}'",
            operator.symbol(),
            operand.type_name()
        ))
    };

    match operator {
        UnaryOperator::Not => Ok(Value::Boolean(!operand.is_truthy())),
        UnaryOperator::Negate => match operand.numeric() {
            Some(Numeric::Integral(n)) => n
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(overflow),
            Some(Numeric::Real(x)) => Ok(Value::Float(-x)),
            None => Err(bad()),
        },
        UnaryOperator::Plus => match operand.numeric() {
            Some(Numeric::Integral(n)) => Ok(Value::Integer(n)),
            Some(Numeric::Real(x)) => Ok(Value::Float(x)),
            None => Err(bad()),
        },
        UnaryOperator::Invert => match operand.as_integer() {
            Some(n) => Ok(Value::Integer(!n)),
            None => Err(bad()),
        },
    }
}

pub fn compare(comparison: Comparison, left: &Value, right: &Value) -> Result<bool, Fault> {
    match comparison {
        Comparison::Equal => Ok(equals(left, right)),
        Comparison::NotEqual => Ok(!equals(left, right)),
        Comparison::In => contains(right, left),
        Comparison::NotIn => contains(right, left).map(|found| !found),
        Comparison::Less
        | Comparison::LessEqual
        | Comparison::Greater
        | Comparison::GreaterEqual => {
            let ordering = ordering(comparison, left, right)?;
            Ok(match ordering {
                None => false,
                Some(ordering) => match comparison {
                    Comparison::Less => ordering == Ordering::Less,
                    Comparison::LessEqual => ordering != Ordering::Greater,
                    Comparison::Greater => ordering == Ordering::Greater,
                    _ => ordering != Ordering::Less,
                },
            })
        }
    }
}

fn equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => a == b,
        _ => match (left.numeric(), right.numeric()) {
            (Some(Numeric::Integral(x)), Some(Numeric::Integral(y))) => x == y,
            (Some(a), Some(b)) => a.real() == b.real(),
            _ => false,
        },
    }
}

/// None when the values are unordered (NaN).
pub(crate) fn ordering(
    comparison: Comparison,
    left: &Value,
    right: &Value,
) -> Result<Option<Ordering>, Fault> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Ok(Some(a.cmp(b))),
        _ => match (left.numeric(), right.numeric()) {
            (Some(Numeric::Integral(x)), Some(Numeric::Integral(y))) => Ok(Some(x.cmp(&y))),
            (Some(a), Some(b)) => Ok(a
                .real()
                .partial_cmp(&b.real())),
            _ => Err(Fault::Type(format!(
                "'{}' not supported between instances of '{}' and '{}'",
                comparison.symbol(),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool, Fault> {
    match (container, item) {
        (Value::Text(haystack), Value::Text(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::Text(_), other) => Err(Fault::Type(format!(
            "'in <string>' requires string as left operand, not {}",
            other.type_name()
        ))),
        (other, _) => Err(Fault::Type(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn python_float_repr() {
        assert_eq!(float_repr(1.0), "1.0");
        assert_eq!(float_repr(2.5), "2.5");
        assert_eq!(float_repr(-0.25), "-0.25");
        assert_eq!(float_repr(100.0), "100.0");
        assert_eq!(float_repr(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(1.5e-5), "1.5e-05");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(1e15), "1000000000000000.0");
        assert_eq!(float_repr(f64::INFINITY), "inf");
        assert_eq!(float_repr(f64::NAN), "nan");
    }

    #[test]
    fn displaying_values() {
        assert_eq!(Value::Boolean(true).to_string(), "True");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Text("x".to_string()).repr(), "'x'");
    }

    #[test]
    fn concatenation_is_bounded() {
        let half = Value::Text("x".repeat(MAXIMUM_TEXT / 2));
        assert!(binary(BinaryOperator::Add, &half, &half).is_ok());

        let long = Value::Text("x".repeat(MAXIMUM_TEXT / 2 + 1));
        assert!(matches!(
            binary(BinaryOperator::Add, &long, &long),
            Err(Fault::Overflow(_))
        ));
    }

    #[test]
    fn parsing_text() {
        assert_eq!(parse_integer(" 7 "), Some(7));
        assert_eq!(parse_integer("-1_000"), Some(-1000));
        assert_eq!(parse_integer("7.0"), None);
        assert_eq!(parse_integer("x"), None);
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float(" .5"), Some(0.5));
        assert_eq!(parse_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float("1.2.3"), None);
    }

    #[test]
    fn python_division() {
        let i = Value::Integer;

        assert_eq!(binary(BinaryOperator::Divide, &i(7), &i(2)), Ok(Value::Float(3.5)));
        assert_eq!(binary(BinaryOperator::FloorDivide, &i(-7), &i(2)), Ok(i(-4)));
        assert_eq!(binary(BinaryOperator::Modulo, &i(-7), &i(3)), Ok(i(2)));
        assert_eq!(binary(BinaryOperator::Modulo, &i(7), &i(-3)), Ok(i(-2)));
        assert!(matches!(
            binary(BinaryOperator::Divide, &i(1), &i(0)),
            Err(Fault::ZeroDivision(_))
        ));
    }

    #[test]
    fn mixed_arithmetic() {
        let i = Value::Integer;

        assert_eq!(binary(BinaryOperator::Add, &i(1), &Value::Float(0.5)), Ok(Value::Float(1.5)));
        assert_eq!(binary(BinaryOperator::Add, &Value::Boolean(true), &i(1)), Ok(i(2)));
        assert_eq!(binary(BinaryOperator::Power, &i(2), &i(10)), Ok(i(1024)));
        assert_eq!(binary(BinaryOperator::Power, &i(2), &i(-1)), Ok(Value::Float(0.5)));
        assert_eq!(
            binary(BinaryOperator::Multiply, &Value::Text("ab".to_string()), &i(3)),
            Ok(Value::Text("ababab".to_string()))
        );
        assert!(matches!(
            binary(BinaryOperator::Add, &i(1), &Value::Text("a".to_string())),
            Err(Fault::Type(_))
        ));
        assert!(matches!(
            binary(BinaryOperator::Multiply, &i(i64::MAX), &i(2)),
            Err(Fault::Overflow(_))
        ));
    }

    #[test]
    fn comparisons() {
        let i = Value::Integer;

        assert_eq!(compare(Comparison::Equal, &i(1), &Value::Float(1.0)), Ok(true));
        assert_eq!(compare(Comparison::Equal, &i(1), &Value::Text("1".to_string())), Ok(false));
        assert_eq!(compare(Comparison::Less, &i(1), &i(2)), Ok(true));
        assert_eq!(
            compare(
                Comparison::In,
                &Value::Text("b".to_string()),
                &Value::Text("abc".to_string())
            ),
            Ok(true)
        );
        assert!(compare(Comparison::Less, &i(1), &Value::Text("a".to_string())).is_err());
    }
}
