//! Deterministic rule tables that turn a segment into a priority and copy.

pub mod copy;
pub mod priority;

pub use copy::{generate_copy, GeneratedCopy};
pub use priority::{priority_for, priority_reason_for};
