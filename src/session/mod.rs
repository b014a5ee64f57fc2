//! The caller's context for an insertion, and the end-to-end operation
//! from format string to replaced slots.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::distributing::{distribute_each, distribute_with};
use crate::generating::{GenerationError, Generator, Notice};
use crate::language::Mode;
use crate::parsing::{self, ParseError};

pub const DEFAULT_BUDGET: Duration = Duration::from_millis(100);

/// One replaceable region of text supplied by the host, such as an editor
/// selection.
pub trait Slot {
    fn read_text(&self) -> String;
    fn replace_text(&mut self, text: &str);
}

impl Slot for String {
    fn read_text(&self) -> String {
        self.clone()
    }

    fn replace_text(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// Settings for insertions. A quiet session is what a live preview uses:
/// recoverable failures become notices rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    quiet: bool,
    budget: Duration,
    seed: Option<u64>,
    separator: String,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            quiet: false,
            budget: DEFAULT_BUDGET,
            seed: None,
            separator: "\n".to_string(),
        }
    }
}

impl Session {
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Fix the seed used by the random helpers, making runs repeatable.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsertError {
    Parse(ParseError),
    Generation(GenerationError),
}

impl InsertError {
    pub fn message(&self) -> String {
        match self {
            InsertError::Parse(error) => error.to_string(),
            InsertError::Generation(error) => error.message(),
        }
    }
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for InsertError {}

impl From<ParseError> for InsertError {
    fn from(error: ParseError) -> Self {
        InsertError::Parse(error)
    }
}

impl From<GenerationError> for InsertError {
    fn from(error: GenerationError) -> Self {
        InsertError::Generation(error)
    }
}

/// What an insertion did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Report {
    pub replaced: usize,
    pub notices: Vec<Notice>,
}

impl Session {
    /// Parse the format string, generate values and write them into the
    /// slots. All values are generated before the first slot is written,
    /// so on error no slot has been touched.
    pub fn insert<S: Slot>(&self, format: &str, slots: &mut [S]) -> Result<Report, InsertError> {
        let spec = parsing::parse(format)?;

        let generation = Generator::new(self).generate(&spec, slots.len(), |i| slots[i].read_text())?;

        let assignments = match spec.mode() {
            Mode::Expression => distribute_each(&generation.values, slots.len(), spec.reverse()),
            Mode::Numeric | Mode::Alpha => distribute_with(
                &generation.values,
                slots.len(),
                spec.reverse(),
                &self.separator,
            ),
        };

        for (slot, text) in &assignments {
            slots[*slot].replace_text(text);
        }

        debug!(replaced = assignments.len(), "Inserted {:?}", format);

        Ok(Report {
            replaced: assignments.len(),
            notices: generation.notices,
        })
    }
}
