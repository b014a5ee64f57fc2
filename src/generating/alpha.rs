//! Alphabetic progressions, counting the way spreadsheet columns do: a, b,
//! ..., z, aa, ab, ... There is no zero digit.

use crate::expression::{Environment, Value};
use crate::language::AlphaSpec;

use super::{compile, GenerationError, GenerationState, Notice};

/// Letters for `n`. With a non-zero `length` the sequence wraps around
/// after the last value of that many letters. Values below 1 have no
/// letters.
pub fn encode(n: i64, length: usize) -> String {
    let mut n = n;

    if length > 0 {
        // a period too large for i64 can never be reached anyway
        if let Some(period) = u32::try_from(length)
            .ok()
            .and_then(|length| 26i64.checked_pow(length))
        {
            n = (n - 1).rem_euclid(period) + 1;
        }
    }

    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();

    String::from_utf8(letters).unwrap_or_default()
}

/// The value of a run of lowercase letters; None if it doesn't fit.
pub fn decode(letters: &str) -> Option<i64> {
    letters
        .bytes()
        .try_fold(0i64, |total, c| {
            if !c.is_ascii_lowercase() {
                return None;
            }
            total
                .checked_mul(26)?
                .checked_add((c - b'a' + 1) as i64)
        })
}

pub(super) fn generate(
    state: &mut GenerationState,
    spec: &AlphaSpec<'_>,
    slot_count: usize,
) -> Result<(), GenerationError> {
    let stop = compile(spec.stop)?;

    let upper = spec.is_upper();
    let length = if spec.wrap {
        spec.start
            .len()
    } else {
        0
    };
    let step = Value::Integer(spec.step);
    let count = Value::Integer(slot_count as i64);

    let start = spec
        .start
        .to_ascii_lowercase();
    let mut value = match decode(&start) {
        Some(value) => value,
        None => {
            state.notice(Notice::Overflow { produced: 0 });
            return Ok(());
        }
    };
    let mut previous = Value::Integer(0);

    loop {
        if stop.is_none() && state.produced() >= slot_count {
            break;
        }
        if state.expired() {
            break;
        }

        let mut letters = encode(value, length);
        if upper {
            letters.make_ascii_uppercase();
        }
        let current = Value::Text(letters);

        if stop.is_some() {
            let environment = Environment::new()
                .bind("_", current.clone())
                .bind("i", Value::Integer(value))
                .bind("p", previous.clone())
                .bind("s", step.clone())
                .bind("n", count.clone())
                .bind("c", current.clone());
            if state.should_stop(stop.as_ref(), &environment)? {
                break;
            }
        }

        if !state.render(&current, spec.format)? {
            break;
        }
        previous = current;

        // the last value needed may be the last one representable
        if stop.is_none() && state.produced() >= slot_count {
            break;
        }

        value = match value.checked_add(spec.step) {
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
