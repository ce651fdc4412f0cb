pub mod assignment;
pub mod class;
pub mod course;

pub use assignment::{Assignment, AssignmentStatus, NewAssignmentRequest, Priority, UpdateAssignmentRequest};
pub use class::{Class, ClassKind, NewClassRequest, UpdateClassRequest};
pub use course::{Course, GradeCategory, NewCourseRequest, UpdateCourseRequest, default_grade_categories};

use serde::{Deserialize, Deserializer};

/// Lets a patch tell "absent" (`None`) apart from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
