//! Parsing of the format mini-language used after `~`, in the form
//! `[[fill]align][sign][#][0][width][.precision][type]`.

use std::fmt;

// Padding beyond this is refused rather than allocated.
pub const MAXIMUM_WIDTH: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

impl Align {
    fn from_char(c: char) -> Option<Align> {
        match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::AfterSign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Negative,
    Always,
    Space,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Specifier {
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Option<Sign>,
    pub alternate: bool,
    pub zero: bool,
    pub width: usize,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    Invalid(String),
    UnknownCode { code: char, type_name: &'static str },
    NotAllowed(String),
    TooLarge(String),
}

impl FormatError {
    pub fn message(&self) -> String {
        match self {
            FormatError::Invalid(spec) => format!("Invalid format specifier '{}'", spec),
            FormatError::UnknownCode { code, type_name } => format!(
                "Unknown format code '{}' for object of type '{}'",
                code, type_name
            ),
            FormatError::NotAllowed(message) => message.clone(),
            FormatError::TooLarge(spec) => format!("Too large a width or precision in '{}'", spec),
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueError: {}", self.message())
    }
}

impl std::error::Error for FormatError {}

impl Specifier {
    pub fn parse(spec: &str) -> Result<Specifier, FormatError> {
        let chars: Vec<char> = spec
            .chars()
            .collect();
        let mut result = Specifier::default();
        let mut i = 0;

        // fill is only recognized when followed by an alignment character
        if chars.len() >= 2 {
            if let Some(align) = Align::from_char(chars[1]) {
                result.fill = Some(chars[0]);
                result.align = Some(align);
                i = 2;
            }
        }
        if i == 0 {
            if let Some(align) = chars
                .first()
                .copied()
                .and_then(Align::from_char)
            {
                result.align = Some(align);
                i = 1;
            }
        }

        result.sign = match chars.get(i) {
            Some('-') => Some(Sign::Negative),
            Some('+') => Some(Sign::Always),
            Some(' ') => Some(Sign::Space),
            _ => None,
        };
        if result
            .sign
            .is_some()
        {
            i += 1;
        }

        if chars.get(i) == Some(&'#') {
            result.alternate = true;
            i += 1;
        }

        if chars.get(i) == Some(&'0') {
            result.zero = true;
            i += 1;
        }

        let (width, next) = read_digits(&chars, i);
        i = next;
        if let Some(width) = width {
            result.width = bounded(width, spec)?;
        }

        if chars.get(i) == Some(&'.') {
            let (precision, next) = read_digits(&chars, i + 1);
            match precision {
                Some(precision) => result.precision = Some(bounded(precision, spec)?),
                None => return Err(FormatError::Invalid(spec.to_string())),
            }
            i = next;
        }

        if let Some(&kind) = chars.get(i) {
            result.kind = Some(kind);
            i += 1;
        }

        if i != chars.len() {
            return Err(FormatError::Invalid(spec.to_string()));
        }

        Ok(result)
    }
}

fn read_digits(chars: &[char], start: usize) -> (Option<String>, usize) {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end == start {
        (None, start)
    } else {
        (Some(chars[start..end].iter().collect()), end)
    }
}

fn bounded(digits: String, spec: &str) -> Result<usize, FormatError> {
    match digits.parse::<usize>() {
        Ok(n) if n <= MAXIMUM_WIDTH => Ok(n),
        _ => Err(FormatError::TooLarge(spec.to_string())),
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(Specifier::parse(""), Ok(Specifier::default()));
    }

    #[test]
    fn zero_padded_width() {
        let spec = Specifier::parse("03").unwrap();
        assert!(spec.zero);
        assert_eq!(spec.width, 3);
        assert_eq!(spec.fill, None);
    }

    #[test]
    fn everything() {
        assert_eq!(
            Specifier::parse("*^+#010.3f"),
            Ok(Specifier {
                fill: Some('*'),
                align: Some(Align::Center),
                sign: Some(Sign::Always),
                alternate: true,
                zero: true,
                width: 10,
                precision: Some(3),
                kind: Some('f'),
            })
        );
    }

    #[test]
    fn alignment_character_as_fill() {
        let spec = Specifier::parse("<<5").unwrap();
        assert_eq!(spec.fill, Some('<'));
        assert_eq!(spec.align, Some(Align::Left));
        assert_eq!(spec.width, 5);
    }

    #[test]
    fn rejects_leftovers() {
        assert_eq!(
            Specifier::parse("5dd"),
            Err(FormatError::Invalid("5dd".to_string()))
        );
        assert_eq!(
            Specifier::parse(".f"),
            Err(FormatError::Invalid(".f".to_string()))
        );
    }

    #[test]
    fn rejects_huge_width() {
        assert!(matches!(
            Specifier::parse("99999999999999999999"),
            Err(FormatError::TooLarge(_))
        ));
    }
}
