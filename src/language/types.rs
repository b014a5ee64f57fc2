//! Types representing a parsed format string

use std::fmt;

/// A start or step value as written by the user. Integers stay integers
/// unless something about the format forces promotion to floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integral(i64),
    Floating(f64),
}

impl Number {
    pub fn is_floating(&self) -> bool {
        matches!(self, Number::Floating(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integral(n) => write!(f, "{}", n),
            Number::Floating(x) => write!(f, "{}", crate::expression::float_repr(*x)),
        }
    }
}

/// The coercion applied to each slot's existing text in expression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cast {
    #[default]
    Text,
    Boolean,
    Integer,
    Float,
}

impl Cast {
    pub fn from_marker(marker: &str) -> Option<Cast> {
        match marker {
            "s" => Some(Cast::Text),
            "b" => Some(Cast::Boolean),
            "i" => Some(Cast::Integer),
            "f" => Some(Cast::Float),
            _ => None,
        }
    }

    pub fn marker(&self) -> char {
        match self {
            Cast::Text => 's',
            Cast::Boolean => 'b',
            Cast::Integer => 'i',
            Cast::Float => 'f',
        }
    }

    /// The name of the equivalent conversion function in the expression
    /// language.
    pub fn name(&self) -> &'static str {
        match self {
            Cast::Text => "str",
            Cast::Boolean => "bool",
            Cast::Integer => "int",
            Cast::Float => "float",
        }
    }
}

/// Which of the three top-level grammars a format string matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Numeric,
    Alpha,
    Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormatSpec<'i> {
    Numeric(NumericSpec<'i>),
    Alpha(AlphaSpec<'i>),
    Expression(ExpressionSpec<'i>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSpec<'i> {
    pub start: Number,
    pub step: Number,
    pub format: Option<&'i str>,
    pub expr: Option<&'i str>,
    pub stop: Option<&'i str>,
    pub reverse: bool,
}

impl Default for NumericSpec<'_> {
    fn default() -> Self {
        NumericSpec {
            start: Number::Integral(1),
            step: Number::Integral(1),
            format: None,
            expr: None,
            stop: None,
            reverse: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlphaSpec<'i> {
    pub start: &'i str,
    pub step: i64,
    pub format: Option<&'i str>,
    pub wrap: bool,
    pub stop: Option<&'i str>,
    pub reverse: bool,
}

impl<'i> AlphaSpec<'i> {
    /// Output casing follows the casing of the start token.
    pub fn is_upper(&self) -> bool {
        self.start
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionSpec<'i> {
    pub cast: Cast,
    pub format: Option<&'i str>,
    pub expr: &'i str,
    pub stop: Option<&'i str>,
    pub reverse: bool,
}

impl<'i> FormatSpec<'i> {
    pub fn mode(&self) -> Mode {
        match self {
            FormatSpec::Numeric(_) => Mode::Numeric,
            FormatSpec::Alpha(_) => Mode::Alpha,
            FormatSpec::Expression(_) => Mode::Expression,
        }
    }

    pub fn reverse(&self) -> bool {
        match self {
            FormatSpec::Numeric(spec) => spec.reverse,
            FormatSpec::Alpha(spec) => spec.reverse,
            FormatSpec::Expression(spec) => spec.reverse,
        }
    }

    pub fn stop(&self) -> Option<&'i str> {
        match self {
            FormatSpec::Numeric(spec) => spec.stop,
            FormatSpec::Alpha(spec) => spec.stop,
            FormatSpec::Expression(spec) => spec.stop,
        }
    }
}

// Renders the canonical form of the format string, with every defaulted
// field written out explicitly. Parsing the result yields an equal spec.
impl fmt::Display for FormatSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSpec::Numeric(spec) => {
                write!(f, "{}:{}", spec.start, spec.step)?;
                if let Some(format) = spec.format {
                    write!(f, "~{}", format)?;
                }
                if let Some(expr) = spec.expr {
                    write!(f, "::{}", expr)?;
                }
            }
            FormatSpec::Alpha(spec) => {
                write!(f, "{}:{}", spec.start, spec.step)?;
                if spec.format.is_some() || spec.wrap {
                    write!(f, "~{}", spec.format.unwrap_or(""))?;
                    if spec.wrap {
                        f.write_str("w")?;
                    }
                }
            }
            FormatSpec::Expression(spec) => {
                write!(f, "{}|", spec.cast.marker())?;
                if let Some(format) = spec.format {
                    write!(f, "~{}::", format)?;
                }
                f.write_str(spec.expr)?;
            }
        }

        if let Some(stop) = self.stop() {
            write!(f, "@{}", stop)?;
        }
        if self.reverse() {
            f.write_str("!")?;
        }
        Ok(())
    }
}
