//! Assignment domain models.
//!
//! Core data types for the TA-assignment problem:
//!
//! - [`Ta`]: a teaching assistant with an assignment limit and
//!   per-section [`Preference`] labels
//! - [`Section`]: a course section with a day/time slot and minimum
//!   TA requirement
//! - [`AssignmentMatrix`]: the boolean TA-by-section solution grid

mod matrix;
mod section;
mod ta;

pub use matrix::AssignmentMatrix;
pub use section::Section;
pub use ta::{Preference, Ta};
