//! Core data model for the interview wizard.
//!
//! These types describe what the wizard collects:
//! the draft, the complete request, its fields, steps and time slots.

mod field;
mod request;
mod slot;
mod step;

pub use field::{Field, UnknownField};
pub use request::{
    DateSelection, Draft, EmailRule, InterviewRequest, InvalidDate, MIN_MESSAGE_CHARS, long_date,
};
pub use slot::{TimeSlot, UnknownSlot};
pub use step::Step;
