//! Rendering values according to a parsed Specifier, following the rules
//! of Python's `format()` builtin.

use crate::expression::{float_repr, Value};
use crate::formatting::specifier::{Align, FormatError, Sign, Specifier};

/// Format a value with the given spec text. An empty spec gives the plain
/// string conversion.
pub fn format_value(value: &Value, spec: &str) -> Result<String, FormatError> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }

    let specifier = Specifier::parse(spec)?;

    match value {
        Value::Text(text) => format_text(text, &specifier),
        Value::Boolean(b) => format_integer(*b as i64, "bool", &specifier),
        Value::Integer(n) => format_integer(*n, "int", &specifier),
        Value::Float(x) => format_float(*x, &specifier),
    }
}

fn format_text(text: &str, spec: &Specifier) -> Result<String, FormatError> {
    match spec.kind {
        None | Some('s') => (),
        Some(code) => {
            return Err(FormatError::UnknownCode {
                code,
                type_name: "str",
            })
        }
    }
    if spec
        .sign
        .is_some()
    {
        return Err(FormatError::NotAllowed(
            "Sign not allowed in string format specifier".to_string(),
        ));
    }
    if spec.alternate {
        return Err(FormatError::NotAllowed(
            "Alternate form (#) not allowed in string format specifier".to_string(),
        ));
    }
    if spec.align == Some(Align::AfterSign) {
        return Err(FormatError::NotAllowed(
            "'=' alignment not allowed in string format specifier".to_string(),
        ));
    }

    let body: String = match spec.precision {
        Some(precision) => text
            .chars()
            .take(precision)
            .collect(),
        None => text.to_string(),
    };

    let fill = spec
        .fill
        .unwrap_or(if spec.zero { '0' } else { ' ' });
    let align = spec
        .align
        .unwrap_or(Align::Left);

    Ok(pad("", &body, fill, align, spec.width))
}

fn format_integer(n: i64, type_name: &'static str, spec: &Specifier) -> Result<String, FormatError> {
    let kind = spec
        .kind
        .unwrap_or('d');

    match kind {
        'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%' => return format_float(n as f64, spec),
        'b' | 'c' | 'd' | 'n' | 'o' | 'x' | 'X' => (),
        code => return Err(FormatError::UnknownCode { code, type_name }),
    }

    if spec
        .precision
        .is_some()
    {
        return Err(FormatError::NotAllowed(
            "Precision not allowed in integer format specifier".to_string(),
        ));
    }

    let magnitude = n.unsigned_abs();
    let (prefix, digits) = match kind {
        'b' => ("0b", format!("{:b}", magnitude)),
        'o' => ("0o", format!("{:o}", magnitude)),
        'x' => ("0x", format!("{:x}", magnitude)),
        'X' => ("0X", format!("{:X}", magnitude)),
        'c' => {
            if spec
                .sign
                .is_some()
            {
                return Err(FormatError::NotAllowed(
                    "Sign not allowed with integer format specifier 'c'".to_string(),
                ));
            }
            if spec.alternate {
                return Err(FormatError::NotAllowed(
                    "Alternate form (#) not allowed with integer format specifier 'c'"
                        .to_string(),
                ));
            }
            let c = u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| {
                    FormatError::NotAllowed("%c arg not in range(0x110000)".to_string())
                })?;
            let fill = spec
                .fill
                .unwrap_or(' ');
            let align = spec
                .align
                .unwrap_or(Align::Left);
            return Ok(pad("", &c.to_string(), fill, align, spec.width));
        }
        _ => ("", magnitude.to_string()),
    };

    let mut lead = sign_of(n < 0, spec.sign).to_string();
    if spec.alternate {
        lead.push_str(prefix);
    }

    Ok(pad_number(&lead, &digits, spec))
}

fn format_float(x: f64, spec: &Specifier) -> Result<String, FormatError> {
    let upper = matches!(spec.kind, Some('E' | 'F' | 'G'));

    let body = if !x.is_finite() {
        let word = if x.is_nan() { "nan" } else { "inf" };
        let word = if upper { word.to_uppercase() } else { word.to_string() };
        match spec.kind {
            Some('%') => format!("{}%", word),
            Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | 'n') | None => word,
            Some(code) => {
                return Err(FormatError::UnknownCode {
                    code,
                    type_name: "float",
                })
            }
        }
    } else {
        let magnitude = x.abs();
        match spec.kind {
            Some('e' | 'E') => {
                scientific(magnitude, spec.precision.unwrap_or(6), spec.alternate, upper)
            }
            Some('f' | 'F') => fixed(magnitude, spec.precision.unwrap_or(6), spec.alternate),
            Some('g' | 'G' | 'n') => {
                general(magnitude, spec.precision.unwrap_or(6), spec.alternate, upper, false)
            }
            Some('%') => format!(
                "{}%",
                fixed(magnitude * 100.0, spec.precision.unwrap_or(6), spec.alternate)
            ),
            None => match spec.precision {
                Some(precision) => general(magnitude, precision, spec.alternate, false, true),
                None => {
                    let repr = float_repr(magnitude);
                    if spec.alternate && !repr.contains('.') && !repr.contains('e') {
                        format!("{}.", repr)
                    } else {
                        repr
                    }
                }
            },
            Some(code) => {
                return Err(FormatError::UnknownCode {
                    code,
                    type_name: "float",
                })
            }
        }
    };

    let lead = sign_of(x.is_sign_negative() && !x.is_nan(), spec.sign);
    Ok(pad_number(lead, &body, spec))
}

fn sign_of(negative: bool, sign: Option<Sign>) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, Some(Sign::Always)) => "+",
        (false, Some(Sign::Space)) => " ",
        (false, _) => "",
    }
}

fn fixed(x: f64, precision: usize, alternate: bool) -> String {
    let result = format!("{:.*}", precision, x);
    if alternate && precision == 0 {
        format!("{}.", result)
    } else {
        result
    }
}

/// Split Rust's `{:e}` output into mantissa and decimal exponent.
fn decompose(x: f64, precision: usize) -> (String, i32) {
    let text = format!("{:.*e}", precision, x);
    match text.split_once('e') {
        Some((mantissa, exponent)) => (
            mantissa.to_string(),
            exponent
                .parse()
                .unwrap_or(0),
        ),
        None => (text, 0),
    }
}

fn scientific(x: f64, precision: usize, alternate: bool, upper: bool) -> String {
    let (mut mantissa, exponent) = decompose(x, precision);
    if alternate && precision == 0 {
        mantissa.push('.');
    }
    let e = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}{}{}{:02}", mantissa, e, sign, exponent.abs())
}

// With `plain` set this is the empty presentation type: fixed notation
// keeps at least one fractional digit, and scientific notation takes
// over one exponent earlier.
fn general(x: f64, precision: usize, alternate: bool, upper: bool, plain: bool) -> String {
    let precision = precision.max(1);

    let exponent = if x == 0.0 {
        0
    } else {
        decompose(x, precision - 1).1
    };

    let limit = if plain {
        precision as i32 - 1
    } else {
        precision as i32
    };

    let mut result = if exponent >= -4 && exponent < limit {
        let digits = (precision as i32 - 1 - exponent).max(0) as usize;
        let mut text = format!("{:.*}", digits, x);
        if alternate && !text.contains('.') {
            text.push('.');
        }
        text
    } else {
        scientific(x, precision - 1, alternate, upper)
    };

    if !alternate {
        result = strip_zeros(&result);
    }

    let exponential = result.contains(|c: char| c == 'e' || c == 'E');
    if plain && !exponential && !result.contains('.') && x.is_finite() {
        result.push_str(".0");
    }

    result
}

fn strip_zeros(text: &str) -> String {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => text.split_at(i),
        None => (text, ""),
    };
    if !mantissa.contains('.') {
        return text.to_string();
    }
    let mantissa = mantissa
        .trim_end_matches('0')
        .trim_end_matches('.');
    format!("{}{}", mantissa, exponent)
}

fn pad_number(lead: &str, body: &str, spec: &Specifier) -> String {
    let (fill, align) = match (spec.fill, spec.align, spec.zero) {
        (fill, Some(align), zero) => (fill.unwrap_or(if zero { '0' } else { ' ' }), align),
        (fill, None, true) => (fill.unwrap_or('0'), Align::AfterSign),
        (fill, None, false) => (fill.unwrap_or(' '), Align::Right),
    };
    pad(lead, body, fill, align, spec.width)
}

fn pad(lead: &str, body: &str, fill: char, align: Align, width: usize) -> String {
    let length = lead
        .chars()
        .count()
        + body
            .chars()
            .count();

    if length >= width {
        return format!("{}{}", lead, body);
    }

    let margin = width - length;
    let padding = |n: usize| -> String { std::iter::repeat(fill).take(n).collect() };

    match align {
        Align::Left => format!("{}{}{}", lead, body, padding(margin)),
        Align::Right => format!("{}{}{}", padding(margin), lead, body),
        Align::AfterSign => format!("{}{}{}", lead, padding(margin), body),
        Align::Center => {
            let left = margin / 2;
            format!("{}{}{}{}", padding(left), lead, body, padding(margin - left))
        }
    }
}
