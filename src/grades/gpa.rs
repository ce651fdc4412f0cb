use serde::Serialize;

use crate::grades::scale::grade_point;
use crate::models::Course;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaSummary {
    pub gpa: f64,
    pub graded_courses: usize,
    pub graded_credits: u64,
    /// Credits across every course, graded or not.
    pub total_credits: u64,
}

/// Credit-weighted GPA over courses that have a `current_grade`. Ungraded
/// courses are left out of both the points and the credits.
pub fn compute_gpa(courses: &[Course]) -> f64 {
    let (points, credits) = courses
        .iter()
        .filter_map(|c| c.current_grade.map(|grade| (grade, u64::from(c.credits))))
        .fold((0.0, 0u64), |(points, credits), (grade, course_credits)| {
            (
                points + grade_point(grade) * course_credits as f64,
                credits.saturating_add(course_credits),
            )
        });

    if credits > 0 {
        points / credits as f64
    } else {
        0.0
    }
}

pub fn gpa_summary(courses: &[Course]) -> GpaSummary {
    let graded: Vec<&Course> = courses.iter().filter(|c| c.current_grade.is_some()).collect();
    GpaSummary {
        gpa: compute_gpa(courses),
        graded_courses: graded.len(),
        graded_credits: graded.iter().map(|c| u64::from(c.credits)).sum(),
        total_credits: courses.iter().map(|c| u64::from(c.credits)).sum(),
    }
}
