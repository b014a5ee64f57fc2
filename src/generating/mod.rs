//! Execution of a parsed format string: producing the sequence of
//! replacement strings, bounded by the slot count, an optional stop
//! condition, and a wall-clock budget.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::expression::{Environment, EvalError, Interpreter, Program, Value};
use crate::formatting::{format_value, FormatError};
use crate::language::{Cast, FormatSpec};
use crate::session::Session;

mod alpha;
mod expression;
mod numeric;

pub use alpha::{decode, encode};

/// Text in a slot that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastError {
    pub text: String,
    pub cast: Cast,
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Could not convert {:?} with {}()",
            self.text,
            self.cast.name()
        )
    }
}

impl std::error::Error for CastError {}

impl Cast {
    pub fn apply(&self, text: &str) -> Result<Value, CastError> {
        let failed = || CastError {
            text: text.to_string(),
            cast: *self,
        };

        match self {
            Cast::Text => Ok(Value::Text(text.to_string())),
            Cast::Boolean => Ok(Value::Boolean(!text.is_empty())),
            Cast::Integer => crate::expression::parse_integer(text)
                .map(Value::Integer)
                .ok_or_else(failed),
            Cast::Float => crate::expression::parse_float(text)
                .map(Value::Float)
                .ok_or_else(failed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    Evaluation(EvalError),
    Cast(CastError),
    Format(FormatError),
}

impl GenerationError {
    pub fn message(&self) -> String {
        match self {
            GenerationError::Evaluation(error) => error.to_string(),
            GenerationError::Cast(error) => error.to_string(),
            GenerationError::Format(error) => format!("Invalid format: {}", error.message()),
        }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for GenerationError {}

impl From<EvalError> for GenerationError {
    fn from(error: EvalError) -> Self {
        GenerationError::Evaluation(error)
    }
}

impl From<CastError> for GenerationError {
    fn from(error: CastError) -> Self {
        GenerationError::Cast(error)
    }
}

impl From<FormatError> for GenerationError {
    fn from(error: FormatError) -> Self {
        GenerationError::Format(error)
    }
}

/// Something the user should hear about that did not stop the operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    BudgetExceeded { produced: usize, budget: Duration },
    CastFallback(CastError),
    EvaluationFallback(EvalError),
    StoppedEarly(GenerationError),
    Overflow { produced: usize },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::BudgetExceeded { produced, budget } => format!(
                "Stopped after {} values; generation took longer than {} ms",
                produced,
                budget.as_millis()
            ),
            Notice::CastFallback(error) => format!("{}; kept the original text", error),
            Notice::EvaluationFallback(error) => format!("{}; kept the unevaluated value", error),
            Notice::StoppedEarly(error) => format!("{}; stopped early", error),
            Notice::Overflow { produced } => {
                format!("Stopped after {} values; the sequence ran out of range", produced)
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// The outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generation {
    pub values: Vec<String>,
    pub notices: Vec<Notice>,
}

/// Everything one run mutates. Created per call to generate() and
/// discarded afterwards.
pub(crate) struct GenerationState {
    interpreter: Interpreter,
    quiet: bool,
    started: Instant,
    budget: Duration,
    values: Vec<String>,
    notices: Vec<Notice>,
}

impl GenerationState {
    fn new(session: &Session) -> GenerationState {
        GenerationState {
            interpreter: Interpreter::new(session.seed()),
            quiet: session.quiet(),
            started: Instant::now(),
            budget: session.budget(),
            values: Vec::new(),
            notices: Vec::new(),
        }
    }

    fn produced(&self) -> usize {
        self.values
            .len()
    }

    fn emit(&mut self, value: String) {
        self.values
            .push(value);
    }

    /// Recorded once no matter how many times it happens.
    fn notice(&mut self, notice: Notice) {
        if !self
            .notices
            .contains(&notice)
        {
            debug!(%notice);
            self.notices
                .push(notice);
        }
    }

    /// Checked once per iteration; a single slow evaluation is never
    /// interrupted.
    fn expired(&mut self) -> bool {
        if self
            .started
            .elapsed()
            <= self.budget
        {
            return false;
        }

        debug!(produced = self.produced(), "Budget exceeded");
        self.notice(Notice::BudgetExceeded {
            produced: self.produced(),
            budget: self.budget,
        });
        true
    }

    /// Quiet runs carry on past a failure with a notice; otherwise the
    /// failure aborts the run.
    fn tolerate(
        &mut self,
        error: GenerationError,
        notice: impl FnOnce(GenerationError) -> Notice,
    ) -> Result<(), GenerationError> {
        if self.quiet {
            self.notice(notice(error));
            Ok(())
        } else {
            Err(error)
        }
    }

    fn evaluate(
        &mut self,
        program: &Program<'_>,
        environment: &Environment,
    ) -> Result<Value, EvalError> {
        program.evaluate(&mut self.interpreter, environment)
    }

    /// Evaluate the stop condition, if there is one. Ok(true) means stop;
    /// in quiet runs a failing condition also stops, with a notice.
    fn should_stop(
        &mut self,
        stop: Option<&Program<'_>>,
        environment: &Environment,
    ) -> Result<bool, GenerationError> {
        let program = match stop {
            Some(program) => program,
            None => return Ok(false),
        };

        match self.evaluate(program, environment) {
            Ok(value) => Ok(value.is_truthy()),
            Err(error) => {
                self.tolerate(error.into(), Notice::StoppedEarly)?;
                Ok(true)
            }
        }
    }

    /// Format and emit a value. Returns false if a quiet run could not
    /// format it and should stop.
    fn render(&mut self, value: &Value, format: Option<&str>) -> Result<bool, GenerationError> {
        match format_value(value, format.unwrap_or("")) {
            Ok(text) => {
                self.emit(text);
                Ok(true)
            }
            Err(error) => {
                self.tolerate(error.into(), Notice::StoppedEarly)?;
                Ok(false)
            }
        }
    }

    fn finish(self) -> Generation {
        let elapsed = self
            .started
            .elapsed();
        debug!(produced = self.produced(), ?elapsed, "Generation finished");
        Generation {
            values: self.values,
            notices: self.notices,
        }
    }
}

/// Compile an optional expression once for the whole run.
fn compile(text: Option<&str>) -> Result<Option<Program<'_>>, GenerationError> {
    match text {
        Some(text) => Ok(Some(Program::compile(text)?)),
        None => Ok(None),
    }
}

/// Produces replacement strings for a parsed format string.
#[derive(Debug)]
pub struct Generator<'s> {
    session: &'s Session,
}

impl<'s> Generator<'s> {
    pub fn new(session: &'s Session) -> Generator<'s> {
        Generator { session }
    }

    /// Run the parsed format against `slot_count` slots. The reader supplies the
    /// current text of a slot by index and is only consulted in expression
    /// mode. Nothing is written anywhere; the caller distributes the
    /// values.
    pub fn generate<F>(
        &self,
        spec: &FormatSpec<'_>,
        slot_count: usize,
        reader: F,
    ) -> Result<Generation, GenerationError>
    where
        F: Fn(usize) -> String,
    {
        let mut state = GenerationState::new(self.session);

        match spec {
            FormatSpec::Numeric(spec) => numeric::generate(&mut state, spec, slot_count)?,
            FormatSpec::Alpha(spec) => alpha::generate(&mut state, spec, slot_count)?,
            FormatSpec::Expression(spec) => {
                expression::generate(&mut state, spec, slot_count, reader)?
            }
        }

        Ok(state.finish())
    }
}
