//! Registration form validation and input sanitizing
//!
//! `validators` holds the ordered first-failure checks run before a
//! submission leaves the form (and again by the intake handler); `filters`
//! holds the entry-time sanitizers applied while the form is being filled.

pub mod filters;
pub mod validators;

pub use validators::{Candidate, Violation, is_valid_phone, validate_candidate};
