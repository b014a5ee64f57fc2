//! Assigning generated values to slots.

/// The order in which slots receive values: front to back, or back to
/// front when reversed.
pub fn slot_order(slot_count: usize, reverse: bool) -> impl Iterator<Item = usize> {
    (0..slot_count).map(move |position| {
        if reverse {
            slot_count - 1 - position
        } else {
            position
        }
    })
}

/// Pair each slot with its text, in assignment order. Slots beyond the
/// generated values are emptied. When there are more values than slots,
/// the last slot assigned takes everything left over, one per line.
pub fn distribute(values: &[String], slot_count: usize, reverse: bool) -> Vec<(usize, String)> {
    distribute_with(values, slot_count, reverse, "\n")
}

pub fn distribute_with(
    values: &[String],
    slot_count: usize,
    reverse: bool,
    separator: &str,
) -> Vec<(usize, String)> {
    let last = slot_count.saturating_sub(1);

    slot_order(slot_count, reverse)
        .enumerate()
        .map(|(position, slot)| {
            let text = if position >= values.len() {
                String::new()
            } else if position == last && slot_count > 1 && values.len() != slot_count {
                values[position..].join(separator)
            } else {
                values[position].clone()
            };
            (slot, text)
        })
        .collect()
}

/// Expression mode: each value came from its own slot, so assignment is
/// strictly one to one and slots without a value are left alone.
pub fn distribute_each(values: &[String], slot_count: usize, reverse: bool) -> Vec<(usize, String)> {
    slot_order(slot_count, reverse)
        .zip(values.iter().cloned())
        .collect()
}
