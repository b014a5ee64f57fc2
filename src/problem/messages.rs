use crate::expression::Fault;
use crate::generating::GenerationError;
use crate::language::*;
use crate::parsing::ParseError;
use crate::session::InsertError;

/// Generate problem and detail messages for an error from an insertion.
pub fn generate_error_message(error: &InsertError) -> (String, String) {
    match error {
        InsertError::Parse(error) => generate_parse_message(error),
        InsertError::Generation(error) => generate_generation_message(error),
    }
}

fn valid_examples() -> Vec<FormatSpec<'static>> {
    vec![
        FormatSpec::Numeric(NumericSpec::default()),
        FormatSpec::Numeric(NumericSpec {
            start: Number::Integral(0),
            step: Number::Integral(5),
            format: Some("03"),
            ..NumericSpec::default()
        }),
        FormatSpec::Numeric(NumericSpec {
            expr: Some("_**2"),
            stop: Some("c>100"),
            reverse: true,
            ..NumericSpec::default()
        }),
        FormatSpec::Alpha(AlphaSpec {
            start: "A",
            step: 2,
            format: None,
            wrap: true,
            stop: None,
            reverse: false,
        }),
        FormatSpec::Expression(ExpressionSpec {
            cast: Cast::Integer,
            format: None,
            expr: "_*2",
            stop: None,
            reverse: false,
        }),
    ]
}

fn generate_parse_message(error: &ParseError) -> (String, String) {
    match error {
        ParseError::NotAString => (
            "Format string is not a string".to_string(),
            "The format string could not be read as text.".to_string(),
        ),
        ParseError::Empty | ParseError::NoGrammarMatched(_) => {
            let examples = valid_examples();
            let problem = match error {
                ParseError::NoGrammarMatched(raw) => format!("Format string is invalid: {}", raw),
                _ => "Format string is empty".to_string(),
            };

            (
                problem,
                format!(
                    r#"
A format string is a start value, then optionally ':' and a step, '~' and a
format, '::' and an expression, '@' and a stop condition, and finally '!' to
fill the selections in reverse. Letters count alphabetically, and a leading
'|' (optionally preceded by one of i, f, s, or b) transforms the existing
text of each selection instead. Some examples:

    {}
    {}
    {}
    {}
    {}
                    "#,
                    examples[0], examples[1], examples[2], examples[3], examples[4]
                )
                .trim_ascii()
                .to_string(),
            )
        }
        ParseError::InvalidNumber(value) => (
            format!("Number out of range '{}'", value),
            "Start and step values must fit in a 64 bit integer or float.".to_string(),
        ),
    }
}

fn generate_generation_message(error: &GenerationError) -> (String, String) {
    match error {
        GenerationError::Evaluation(error) => {
            let hint = match &error.cause {
                Fault::Name(_) => {
                    "\n\nThe names available are _, i, p, s, n, and c, the builtin functions, and the math and random modules."
                }
                Fault::Syntax(_) => "\n\nExpressions are written like Python expressions.",
                _ => "",
            };
            (
                "Invalid Expression".to_string(),
                format!(
                    "The expression `{}` raised an exception:\n\n{}{}",
                    error.expr, error.cause, hint
                ),
            )
        }
        GenerationError::Cast(error) => (
            "Cannot convert selection".to_string(),
            format!(
                "The text {:?} could not be converted with {}(). Use the s| prefix to work with the text as it is.",
                error.text,
                error
                    .cast
                    .name()
            ),
        ),
        GenerationError::Format(error) => (
            "Invalid format".to_string(),
            format!(
                "The value could not be formatted: {}.\n\nFormats follow Python's mini format language, [[fill]align][sign][#][0][width][.precision][type].",
                error.message()
            ),
        ),
    }
}
