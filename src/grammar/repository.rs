//! The named sub-patterns making up the format string grammar, and the
//! resolver that assembles them into complete patterns.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use tracing::trace;

use crate::language::Mode;

pub const NUMERIC_INSERT: &str = "numeric_insert";
pub const ALPHA_INSERT: &str = "alpha_insert";
pub const EXPRESSION_MODE: &str = "expression_mode";

/// A named piece of the grammar. Templates are written in a whitespace
/// insignificant notation with trailing ` # ` comments, and refer to
/// earlier definitions as `{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubPattern {
    pub name: &'static str,
    pub template: &'static str,
}

// Order matters: every definition may only refer to those above it.
pub static DEFINITIONS: &[SubPattern] = &[
    // base
    SubPattern {
        name: "integer",
        template: r"[1-9][0-9]* | 0",
    },
    SubPattern {
        name: "signedint",
        template: r"[+-]? {integer}",
    },
    // float and numeric
    SubPattern {
        name: "pointfloat",
        template: r"{integer}? \. [0-9]+ | {integer} \.",
    },
    SubPattern {
        name: "exponentfloat",
        template: r"(?: {integer} | {pointfloat} ) [eE] [+-]? [0-9]+",
    },
    SubPattern {
        name: "float",
        template: r"{pointfloat} | {exponentfloat}",
    },
    SubPattern {
        name: "numeric",
        template: r"{integer} | {float}",
    },
    SubPattern {
        name: "signednum",
        template: r"[+-]? {numeric}",
    },
    // (format) specific
    SubPattern {
        name: "format",
        template: r"
            (?: [^{}]? [<>=^] )?    # fill and align
            [-+\x20]?               # sign
            \#?                     # alternate form
            0?                      # zero padding
            {integer}?              # width
            (?: \. [0-9]+ )?        # precision
            [bcdeEfFgGnosxX%]?      # type
        ",
    },
    SubPattern {
        name: "alphastart",
        template: r"[a-z]+ | [A-Z]+",
    },
    SubPattern {
        name: "alphaformat",
        template: r"
            (?: [^{}]? [<>=^] )?    # fill and align
            {integer}?              # width
        ",
    },
    SubPattern {
        name: "cast",
        template: r"[ifsb]",
    },
    // expressions are handed to the evaluator untouched
    SubPattern {
        name: "expr",
        template: r".+?",
    },
    SubPattern {
        name: "stopexpr",
        template: r".+?",
    },
    // finals
    SubPattern {
        name: NUMERIC_INSERT,
        template: r"
            ^ (?P<start> {signednum} )?
            (?: : (?P<step> {signednum} ) )?
            (?: ~ (?P<format> {format} ) )?
            (?: :: (?P<expr> {expr} ) )?
            (?: @ (?P<stopexpr> {stopexpr} ) )?
            (?P<reverse> ! )? $
        ",
    },
    SubPattern {
        name: ALPHA_INSERT,
        template: r"
            ^ (?P<start> {alphastart} )
            (?: : (?P<step> {signedint} ) )?
            (?: ~ (?P<format> {alphaformat} ) (?P<wrap> w )? )?
            (?: @ (?P<stopexpr> {stopexpr} ) )?
            (?P<reverse> ! )? $
        ",
    },
    SubPattern {
        name: EXPRESSION_MODE,
        template: r"
            ^ (?P<cast> {cast} )? \|
            (?: ~ (?P<format> {format} ) :: )?
            (?P<expr> {expr} )
            (?: @ (?P<stopexpr> {stopexpr} ) )?
            (?P<reverse> ! )? $
        ",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    Duplicate(&'static str),
    ForwardReference {
        name: &'static str,
        target: String,
    },
    UnknownPlaceholder {
        name: &'static str,
        target: String,
    },
    Missing(String),
    Invalid {
        name: String,
        details: String,
    },
}

impl GrammarError {
    pub fn message(&self) -> String {
        match self {
            GrammarError::Duplicate(name) => format!("pattern '{}' defined more than once", name),
            GrammarError::ForwardReference { name, target } => format!(
                "pattern '{}' refers to '{}' which is not defined until later",
                name, target
            ),
            GrammarError::UnknownPlaceholder { name, target } => {
                format!("pattern '{}' refers to unknown pattern '{}'", name, target)
            }
            GrammarError::Missing(name) => format!("no pattern named '{}'", name),
            GrammarError::Invalid { name, details } => {
                format!("pattern '{}' does not compile: {}", name, details)
            }
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid grammar: {}", self.message())
    }
}

impl std::error::Error for GrammarError {}

/// Every sub-pattern with its placeholders fully substituted.
#[derive(Debug)]
pub struct Repository {
    resolved: HashMap<&'static str, String>,
}

impl Repository {
    /// Resolve the definitions strictly in declaration order. A placeholder
    /// naming something declared further down is rejected outright rather
    /// than being left unsubstituted.
    pub fn build(definitions: &[SubPattern]) -> Result<Repository, GrammarError> {
        let declared: Vec<&str> = definitions
            .iter()
            .map(|definition| definition.name)
            .collect();

        let mut resolved = HashMap::new();

        for (i, definition) in definitions
            .iter()
            .enumerate()
        {
            if resolved.contains_key(definition.name) {
                return Err(GrammarError::Duplicate(definition.name));
            }

            let pattern = substitute(definition, &resolved, &declared[i + 1..])?;
            trace!(name = definition.name, %pattern, "resolved");

            resolved.insert(definition.name, pattern);
        }

        Ok(Repository { resolved })
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.resolved
            .get(name)
            .map(String::as_str)
    }

    /// Return the resolved text of each named pattern, in the order asked.
    pub fn resolve(&self, names: &[&str]) -> Result<Vec<&str>, GrammarError> {
        names
            .iter()
            .map(|name| {
                self.lookup(name)
                    .ok_or_else(|| GrammarError::Missing(name.to_string()))
            })
            .collect()
    }
}

/// The three top-level patterns a format string is matched against.
#[derive(Debug)]
pub struct Grammar {
    numeric_insert: Regex,
    alpha_insert: Regex,
    expression_mode: Regex,
}

impl Grammar {
    pub fn build() -> Result<Grammar, GrammarError> {
        Grammar::from_definitions(DEFINITIONS)
    }

    pub fn from_definitions(definitions: &[SubPattern]) -> Result<Grammar, GrammarError> {
        let repository = Repository::build(definitions)?;
        let patterns = repository.resolve(&[NUMERIC_INSERT, ALPHA_INSERT, EXPRESSION_MODE])?;

        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern).map_err(|error| GrammarError::Invalid {
                name: name.to_string(),
                details: error.to_string(),
            })
        };

        Ok(Grammar {
            numeric_insert: compile(NUMERIC_INSERT, patterns[0])?,
            alpha_insert: compile(ALPHA_INSERT, patterns[1])?,
            expression_mode: compile(EXPRESSION_MODE, patterns[2])?,
        })
    }

    /// The composite patterns in the order they are to be tried.
    pub fn composites(&self) -> [(Mode, &Regex); 3] {
        [
            (Mode::Numeric, &self.numeric_insert),
            (Mode::Alpha, &self.alpha_insert),
            (Mode::Expression, &self.expression_mode),
        ]
    }
}

/// Remove comments and all whitespace; the notation is whitespace
/// insignificant so a literal space has to be written `\x20`.
fn normalize(template: &str) -> String {
    let re = regex!(r"(?m)\s#\s.*$");

    re.replace_all(template, "")
        .split_whitespace()
        .collect()
}

fn substitute(
    definition: &SubPattern,
    resolved: &HashMap<&'static str, String>,
    later: &[&str],
) -> Result<String, GrammarError> {
    let template = normalize(definition.template);
    let re = regex!(r"\{([A-Za-z_][A-Za-z0-9_]*)\}");

    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for cap in re.captures_iter(&template) {
        let (Some(whole), Some(target)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let target = target.as_str();

        match resolved.get(target) {
            Some(pattern) => {
                result.push_str(&template[last..whole.start()]);
                result.push_str("(?:");
                result.push_str(pattern);
                result.push(')');
                last = whole.end();
            }
            None if later.contains(&target) => {
                return Err(GrammarError::ForwardReference {
                    name: definition.name,
                    target: target.to_string(),
                });
            }
            None => {
                return Err(GrammarError::UnknownPlaceholder {
                    name: definition.name,
                    target: target.to_string(),
                });
            }
        }
    }

    result.push_str(&template[last..]);
    Ok(result)
}
