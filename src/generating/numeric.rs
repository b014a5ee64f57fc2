//! Arithmetic progressions, optionally transformed by an expression.

use crate::expression::{Environment, Value};
use crate::language::{Number, NumericSpec};

use super::{compile, GenerationError, GenerationState, Notice};

fn to_value(number: Number, floating: bool) -> Value {
    match number {
        Number::Integral(n) if floating => Value::Float(n as f64),
        Number::Integral(n) => Value::Integer(n),
        Number::Floating(x) => Value::Float(x),
    }
}

// An integer progression is only promoted by a floating start or step, never by
// overflowing; running past the end of i64 ends the sequence instead.
fn advance(value: &Value, step: &Value) -> Option<Value> {
    match (value, step) {
        (Value::Integer(a), Value::Integer(b)) => a
            .checked_add(*b)
            .map(Value::Integer),
        (Value::Float(a), Value::Integer(b)) => Some(Value::Float(a + *b as f64)),
        (Value::Integer(a), Value::Float(b)) => Some(Value::Float(*a as f64 + b)),
        (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
        _ => None,
    }
}

/// Without a stop condition the run is bounded by the slot count; with
/// one, only the condition or the budget ends it.
pub(super) fn generate(
    state: &mut GenerationState,
    spec: &NumericSpec<'_>,
    slot_count: usize,
) -> Result<(), GenerationError> {
    let expr = compile(spec.expr)?;
    let stop = compile(spec.stop)?;

    let floating = spec
        .format
        .map_or(false, |format| format.contains('.'))
        || spec
            .step
            .is_floating();

    let mut value = to_value(spec.start, floating);
    let step = to_value(spec.step, false);
    let count = Value::Integer(slot_count as i64);

    // the previously evaluated value, p
    let mut accumulator = Value::Integer(0);

    loop {
        if stop.is_none() && state.produced() >= slot_count {
            break;
        }
        if state.expired() {
            break;
        }

        let environment = Environment::new()
            .bind("_", value.clone())
            .bind("i", value.clone())
            .bind("p", accumulator.clone())
            .bind("s", step.clone())
            .bind("n", count.clone());

        let current = match &expr {
            Some(program) => match state.evaluate(program, &environment) {
                Ok(result) => result,
                Err(error) => {
                    state.tolerate(error.into(), |error| match error {
                        GenerationError::Evaluation(error) => Notice::EvaluationFallback(error),
                        other => Notice::StoppedEarly(other),
                    })?;
                    value.clone()
                }
            },
            None => value.clone(),
        };

        let environment = environment.bind("c", current.clone());
        if state.should_stop(stop.as_ref(), &environment)? {
            break;
        }

        if !state.render(&current, spec.format)? {
            break;
        }
        accumulator = current;

        // the last value needed may be the last one representable
        if stop.is_none() && state.produced() >= slot_count {
            break;
        }

        value = match advance(&value, &step) {
            Some(next) => next,
            None => {
                state.notice(Notice::Overflow {
                    produced: state.produced(),
                });
                break;
            }
        };
    }

    Ok(())
}

#[cfg(test)]
mod check {
    use super::*;
    use crate::generating::Generator;
    use crate::language::FormatSpec;
    use crate::parsing::parse;
    use crate::session::Session;

    fn values(format: &str, count: usize) -> Vec<String> {
        values_with(format, count, &Session::default())
    }

    fn values_with(format: &str, count: usize, session: &Session) -> Vec<String> {
        let spec = parse(format).unwrap();
        Generator::new(session)
            .generate(&spec, count, |_| String::new())
            .unwrap()
            .values
    }

    #[test]
    fn simple_progressions() {
        assert_eq!(values("1", 3), vec!["1", "2", "3"]);
        assert_eq!(values("10:10", 3), vec!["10", "20", "30"]);
        assert_eq!(values("5:-1", 4), vec!["5", "4", "3", "2"]);
        assert_eq!(values("-2:2", 3), vec!["-2", "0", "2"]);
    }

    #[test]
    fn progression_matches_closed_form() {
        for (start, step) in [(0i64, 3i64), (7, -2), (-100, 25)] {
            let format = format!("{}:{}", start, step);
            let generated = values(&format, 6);
            for (k, text) in generated
                .iter()
                .enumerate()
            {
                assert_eq!(text, &(start + k as i64 * step).to_string());
            }
        }
    }

    #[test]
    fn float_promotion() {
        assert_eq!(values("1:0.5", 3), vec!["1.0", "1.5", "2.0"]);
        assert_eq!(values("1~.2f", 2), vec!["1.00", "2.00"]);
        assert_eq!(values("1.5", 2), vec!["1.5", "2.5"]);
    }

    #[test]
    fn formatted() {
        assert_eq!(values("1:1~03", 3), vec!["001", "002", "003"]);
        assert_eq!(values("8~#x", 2), vec!["0x8", "0x9"]);
        assert_eq!(values("1~>3", 2), vec!["  1", "  2"]);
    }

    #[test]
    fn expression_with_accumulator() {
        assert_eq!(values("1::_*2", 3), vec!["2", "4", "6"]);
        // running sum through the previous value
        assert_eq!(values("1::p+_", 4), vec!["1", "3", "6", "10"]);
        assert_eq!(values("0::s*n", 2), vec!["2", "2"]);
    }

    #[test]
    fn stop_expression_unbounded_by_slots() {
        assert_eq!(values("1@_>5", 2), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(values("1::_*2@c>6", 1), vec!["2", "4", "6"]);
    }

    #[test]
    fn stop_immediately() {
        assert_eq!(values("1@True", 5), Vec::<String>::new());
    }

    #[test]
    fn never_ending_stop_hits_budget() {
        let session = Session::default().with_budget(std::time::Duration::from_millis(20));
        let spec = parse("1@False").unwrap();
        assert!(matches!(spec, FormatSpec::Numeric(_)));

        let generation = Generator::new(&session)
            .generate(&spec, 1, |_| String::new())
            .unwrap();
        assert!(!generation
            .values
            .is_empty());
        assert!(matches!(
            generation.notices[..],
            [Notice::BudgetExceeded { .. }]
        ));
    }

    #[test]
    fn failing_expression() {
        let spec = parse("1::1/0").unwrap();

        let loud = Generator::new(&Session::default()).generate(&spec, 2, |_| String::new());
        assert!(matches!(loud, Err(GenerationError::Evaluation(_))));

        let quiet = Session::default().with_quiet(true);
        assert_eq!(values_with("1::1/0", 2, &quiet), vec!["1", "2"]);
    }

    #[test]
    fn failing_format() {
        let spec = parse("1~s").unwrap();
        let loud = Generator::new(&Session::default()).generate(&spec, 2, |_| String::new());
        assert!(matches!(loud, Err(GenerationError::Format(_))));

        let quiet = Session::default().with_quiet(true);
        assert_eq!(values_with("1~s", 2, &quiet), Vec::<String>::new());
    }

    #[test]
    fn integer_overflow_ends_sequence() {
        let generation = Generator::new(&Session::default())
            .generate(&parse("9223372036854775806").unwrap(), 4, |_| String::new())
            .unwrap();
        assert_eq!(
            generation.values,
            vec!["9223372036854775806", "9223372036854775807"]
        );
        assert_eq!(generation.notices, vec![Notice::Overflow { produced: 2 }]);
    }

    #[test]
    fn ending_exactly_at_the_limit() {
        let generation = Generator::new(&Session::default())
            .generate(&parse("9223372036854775807").unwrap(), 1, |_| String::new())
            .unwrap();
        assert_eq!(generation.values, vec!["9223372036854775807"]);
        assert!(generation
            .notices
            .is_empty());

        let generation = Generator::new(&Session::default())
            .generate(&parse("9223372036854775806").unwrap(), 2, |_| String::new())
            .unwrap();
        assert_eq!(generation.values.len(), 2);
        assert!(generation
            .notices
            .is_empty());
    }
}
