//! Grade computation: the percentage-to-letter scale, per-course weighted
//! grades, and credit-weighted GPA. Everything here is a pure function over
//! snapshots; nothing writes back to the repository.

pub mod course_grade;
pub mod gpa;
pub mod scale;

pub use course_grade::{CategoryBreakdown, GradeBreakdown, compute_course_grade, course_grade_breakdown};
pub use gpa::{GpaSummary, compute_gpa, gpa_summary};
pub use scale::{GradeBand, grade_band, grade_point, letter_grade};
