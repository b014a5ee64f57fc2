//! Generate sequences of numbers, letters, or computed values from a compact
//! format string, and distribute them across a list of text slots.

#[macro_use]
mod regex;

pub mod distributing;
pub mod expression;
pub mod formatting;
pub mod generating;
pub mod grammar;
pub mod language;
pub mod parsing;
pub mod problem;
pub mod session;
