use regex::Captures;
use std::fmt;

use crate::grammar::grammar;
use crate::language::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    NotAString,
    Empty,
    NoGrammarMatched(String),
    InvalidNumber(String),
}

impl ParseError {
    pub fn message(&self) -> String {
        match self {
            ParseError::NotAString => "not a string".to_string(),
            ParseError::Empty => "empty format string".to_string(),
            ParseError::NoGrammarMatched(_) => "no grammar matched".to_string(),
            ParseError::InvalidNumber(value) => format!("number out of range '{}'", value),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoGrammarMatched(raw) => write!(f, "Format string is invalid: {}", raw),
            _ => write!(f, "Format string is invalid: {}", self.message()),
        }
    }
}

impl std::error::Error for ParseError {}

/// Match the format string against each composite pattern in priority
/// order; the first one to match decides the variant.
pub fn parse_format(raw: &str) -> Result<FormatSpec<'_>, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }

    for (mode, re) in grammar().composites() {
        if let Some(cap) = re.captures(raw) {
            return match mode {
                Mode::Numeric => read_numeric(&cap),
                Mode::Alpha => read_alpha(&cap),
                Mode::Expression => read_expression(&cap),
            };
        }
    }

    Err(ParseError::NoGrammarMatched(raw.to_string()))
}

fn read_numeric<'i>(cap: &Captures<'i>) -> Result<FormatSpec<'i>, ParseError> {
    let start = match field(cap, "start") {
        Some(text) => read_number(text)?,
        None => Number::Integral(1),
    };
    let step = match field(cap, "step") {
        Some(text) => read_number(text)?,
        None => Number::Integral(1),
    };

    Ok(FormatSpec::Numeric(NumericSpec {
        start,
        step,
        format: field(cap, "format"),
        expr: field(cap, "expr"),
        stop: field(cap, "stopexpr"),
        reverse: flag(cap, "reverse"),
    }))
}

fn read_alpha<'i>(cap: &Captures<'i>) -> Result<FormatSpec<'i>, ParseError> {
    let start = field(cap, "start").ok_or(ParseError::Empty)?;
    let step = match field(cap, "step") {
        Some(text) => text
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidNumber(text.to_string()))?,
        None => 1,
    };

    Ok(FormatSpec::Alpha(AlphaSpec {
        start,
        step,
        format: field(cap, "format"),
        wrap: flag(cap, "wrap"),
        stop: field(cap, "stopexpr"),
        reverse: flag(cap, "reverse"),
    }))
}

fn read_expression<'i>(cap: &Captures<'i>) -> Result<FormatSpec<'i>, ParseError> {
    let cast = field(cap, "cast")
        .and_then(Cast::from_marker)
        .unwrap_or_default();
    let expr = field(cap, "expr").ok_or(ParseError::Empty)?;

    Ok(FormatSpec::Expression(ExpressionSpec {
        cast,
        format: field(cap, "format"),
        expr,
        stop: field(cap, "stopexpr"),
        reverse: flag(cap, "reverse"),
    }))
}

// Optional groups that matched the empty string are treated as absent.
fn field<'i>(cap: &Captures<'i>, name: &str) -> Option<&'i str> {
    cap.name(name)
        .map(|m| m.as_str())
        .filter(|text| !text.is_empty())
}

fn flag(cap: &Captures<'_>, name: &str) -> bool {
    cap.name(name)
        .is_some()
}

// Integers which don't fit are carried as floating point rather than
// rejected.
fn read_number(text: &str) -> Result<Number, ParseError> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Number::Integral(n));
    }
    text.parse::<f64>()
        .map(Number::Floating)
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}
