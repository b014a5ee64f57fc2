//! Expression mode: each slot's existing text is cast and transformed.

use crate::distributing::slot_order;
use crate::expression::{Environment, Program, Value};
use crate::language::ExpressionSpec;

use super::{compile, GenerationError, GenerationState, Notice};

/// Slots are visited in assignment order (reversed if asked), so the k-th
/// value always belongs to the k-th visited slot. Never produces more
/// values than there are slots.
pub(super) fn generate<F>(
    state: &mut GenerationState,
    spec: &ExpressionSpec<'_>,
    slot_count: usize,
    reader: F,
) -> Result<(), GenerationError>
where
    F: Fn(usize) -> String,
{
    let program = Program::compile(spec.expr)?;
    let stop = compile(spec.stop)?;

    let count = Value::Integer(slot_count as i64);
    let mut accumulator = Value::Integer(0);

    for (index, slot) in slot_order(slot_count, spec.reverse).enumerate() {
        if state.expired() {
            break;
        }

        let raw = reader(slot);

        let value = match spec
            .cast
            .apply(&raw)
        {
            Ok(value) => value,
            Err(error) => {
                // the slot keeps its text unchanged
                state.tolerate(error.into(), |error| match error {
                    GenerationError::Cast(error) => Notice::CastFallback(error),
                    other => Notice::StoppedEarly(other),
                })?;
                state.emit(raw);
                continue;
            }
        };

        let environment = Environment::new()
            .bind("_", value)
            .bind("i", Value::Integer(index as i64))
            .bind("p", accumulator.clone())
            .bind("n", count.clone());

        // later values are meaningless without this one, so even a quiet
        // run gives up here
        let current = state.evaluate(&program, &environment)?;

        let environment = environment.bind("c", current.clone());
        if state.should_stop(stop.as_ref(), &environment)? {
            break;
        }

        if !state.render(&current, spec.format)? {
            break;
        }
        accumulator = current;
    }

    Ok(())
}
