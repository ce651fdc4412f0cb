use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::grades::{
    GpaSummary, GradeBand, GradeBreakdown, compute_course_grade, course_grade_breakdown, gpa_summary,
    grade_band, grade_point, letter_grade,
};
use crate::models::{Assignment, Course};
use crate::repository::Repository;

/// Graded assignments shown per course, most recent by id.
const RECENT_GRADES_LIMIT: usize = 5;

/// A course with its derived grade and the scale lookups for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrade {
    #[serde(flatten)]
    pub course: Course,
    pub letter: Option<&'static str>,
    pub grade_point: Option<f64>,
    pub band: Option<GradeBand>,
    pub graded_assignments: usize,
    pub total_assignments: usize,
    /// Share of the course's assignments that have a grade, as a percentage.
    pub graded_progress: f64,
    /// Plain mean of graded assignments, ignoring category weights.
    pub assignment_average: Option<f64>,
    pub recent_grades: Vec<Assignment>,
}

/// A completed assignment still waiting for its grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwaitingGrade {
    pub assignment_id: i64,
    pub course_id: i64,
    /// `"<course code> - <title>"`.
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub summary: GpaSummary,
    pub courses: Vec<CourseGrade>,
    pub awaiting_grade: Vec<AwaitingGrade>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBreakdown {
    pub course_id: i64,
    pub letter: Option<&'static str>,
    #[serde(flatten)]
    pub breakdown: GradeBreakdown,
}

fn assignments_for(course_id: i64, assignments: &[Assignment]) -> Vec<Assignment> {
    assignments
        .iter()
        .filter(|a| a.course_id == course_id)
        .cloned()
        .collect()
}

/// Replaces every course's `current_grade` with the value computed from its
/// assignments. Whatever was stored before is ignored.
pub fn with_derived_grades(courses: Vec<Course>, assignments: &[Assignment]) -> Vec<Course> {
    courses
        .into_iter()
        .map(|mut course| {
            let own = assignments_for(course.id, assignments);
            course.current_grade = compute_course_grade(&own, &course.grade_categories);
            debug!("course {} grade: {:?}", course.code, course.current_grade);
            course
        })
        .collect()
}

fn course_grade(course: Course, assignments: &[Assignment]) -> CourseGrade {
    let own: Vec<&Assignment> = assignments.iter().filter(|a| a.course_id == course.id).collect();
    let graded: Vec<&Assignment> = own.iter().copied().filter(|a| a.grade.is_some()).collect();

    let grades: Vec<f64> = graded.iter().filter_map(|a| a.grade).collect();
    let assignment_average = if grades.is_empty() {
        None
    } else {
        Some(grades.iter().sum::<f64>() / grades.len() as f64)
    };
    let graded_progress = if own.is_empty() {
        0.0
    } else {
        graded.len() as f64 / own.len() as f64 * 100.0
    };
    let recent_grades = graded[graded.len().saturating_sub(RECENT_GRADES_LIMIT)..]
        .iter()
        .map(|a| (*a).clone())
        .collect();

    CourseGrade {
        letter: course.current_grade.map(letter_grade),
        grade_point: course.current_grade.map(grade_point),
        band: course.current_grade.map(grade_band),
        graded_assignments: graded.len(),
        total_assignments: own.len(),
        graded_progress,
        assignment_average,
        recent_grades,
        course,
    }
}

/// Completed assignments with no grade yet, in id order.
pub fn awaiting_grade(courses: &[Course], assignments: &[Assignment]) -> Vec<AwaitingGrade> {
    let codes: HashMap<i64, &str> = courses.iter().map(|c| (c.id, c.code.as_str())).collect();
    assignments
        .iter()
        .filter(|a| a.is_completed() && a.grade.is_none())
        .map(|a| AwaitingGrade {
            assignment_id: a.id,
            course_id: a.course_id,
            label: format!("{} - {}", codes.get(&a.course_id).copied().unwrap_or(""), a.title),
        })
        .collect()
}

pub fn grade_report(courses: Vec<Course>, assignments: &[Assignment]) -> GradeReport {
    let courses = with_derived_grades(courses, assignments);
    let summary = gpa_summary(&courses);
    let waiting = awaiting_grade(&courses, assignments);

    let courses = courses
        .into_iter()
        .map(|course| course_grade(course, assignments))
        .collect();

    GradeReport {
        summary,
        courses,
        awaiting_grade: waiting,
    }
}

pub struct GradeService {
    courses: Arc<dyn Repository<Course>>,
    assignments: Arc<dyn Repository<Assignment>>,
}

impl GradeService {
    pub fn new(courses: Arc<dyn Repository<Course>>, assignments: Arc<dyn Repository<Assignment>>) -> Self {
        Self { courses, assignments }
    }

    pub async fn courses_with_grades(&self) -> Result<Vec<Course>, AppError> {
        let courses = self.courses.get_all().await?;
        let assignments = self.assignments.get_all().await?;
        Ok(with_derived_grades(courses, &assignments))
    }

    pub async fn course_with_grade(&self, course_id: i64) -> Result<Course, AppError> {
        let mut course = self.courses.get_by_id(course_id).await?;
        let assignments = assignments_for(course_id, &self.assignments.get_all().await?);
        course.current_grade = compute_course_grade(&assignments, &course.grade_categories);
        Ok(course)
    }

    pub async fn report(&self) -> Result<GradeReport, AppError> {
        let courses = self.courses.get_all().await?;
        let assignments = self.assignments.get_all().await?;
        let report = grade_report(courses, &assignments);
        debug!(
            "gpa {:.2} over {} graded courses",
            report.summary.gpa, report.summary.graded_courses
        );
        Ok(report)
    }

    pub async fn course_breakdown(&self, course_id: i64) -> Result<CourseBreakdown, AppError> {
        let course = self.courses.get_by_id(course_id).await?;
        let assignments = assignments_for(course_id, &self.assignments.get_all().await?);
        let breakdown = course_grade_breakdown(&assignments, &course.grade_categories);

        if !breakdown.unmatched.is_empty() {
            warn!(
                "course {} has graded assignments outside its categories: {:?}",
                course.code, breakdown.unmatched
            );
        }

        Ok(CourseBreakdown {
            course_id,
            letter: breakdown.percentage.map(letter_grade),
            breakdown,
        })
    }
}
