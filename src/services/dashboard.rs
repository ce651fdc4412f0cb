use std::sync::Arc;

use serde::Serialize;

use crate::dates::{DateStatus, WeekDay};
use crate::error::AppError;
use crate::grades::gpa_summary;
use crate::models::{Assignment, Class, Course};
use crate::repository::Repository;
use crate::services::assignments::AssignmentView;
use crate::services::grading::with_derived_grades;

/// How far ahead, in days, an assignment counts as upcoming.
const UPCOMING_WINDOW_DAYS: i64 = 7;
const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub course_id: i64,
    pub code: String,
    pub color: String,
    pub completed: usize,
    pub total: usize,
    /// Percentage of assignments completed, 0 when there are none.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub gpa: f64,
    pub total_credits: u64,
    pub course_count: usize,
    pub upcoming: Vec<AssignmentView>,
    pub upcoming_total: usize,
    pub overdue: Vec<AssignmentView>,
    pub todays_classes: Vec<Class>,
    pub week: Vec<WeekDay>,
    pub progress: Vec<CourseProgress>,
}

pub fn build_dashboard(
    courses: Vec<Course>,
    assignments: &[Assignment],
    classes: &[Class],
    status: &DateStatus,
) -> Dashboard {
    let courses = with_derived_grades(courses, assignments);
    let summary = gpa_summary(&courses);

    let mut upcoming: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| !a.is_completed())
        .filter(|a| (0..=UPCOMING_WINDOW_DAYS).contains(&status.days_until_due(a.due_date)))
        .collect();
    upcoming.sort_by_key(|a| a.due_date);
    let upcoming_total = upcoming.len();

    let overdue = assignments
        .iter()
        .filter(|a| !a.is_completed() && status.is_overdue(a.due_date))
        .map(|a| AssignmentView::new(a.clone(), status))
        .collect();

    let weekday = status.weekday_index();
    let mut todays_classes: Vec<Class> = classes.iter().filter(|c| c.day_of_week == weekday).cloned().collect();
    todays_classes.sort_by(|a, b| a.start_time.cmp(&b.start_time));

    let progress = courses
        .iter()
        .map(|course| {
            let own: Vec<&Assignment> = assignments.iter().filter(|a| a.course_id == course.id).collect();
            let completed = own.iter().filter(|a| a.is_completed()).count();
            let completion_rate = if own.is_empty() {
                0.0
            } else {
                completed as f64 / own.len() as f64 * 100.0
            };
            CourseProgress {
                course_id: course.id,
                code: course.code.clone(),
                color: course.color.clone(),
                completed,
                total: own.len(),
                completion_rate,
            }
        })
        .collect();

    Dashboard {
        gpa: summary.gpa,
        total_credits: summary.total_credits,
        course_count: courses.len(),
        upcoming: upcoming
            .into_iter()
            .take(UPCOMING_LIMIT)
            .map(|a| AssignmentView::new(a.clone(), status))
            .collect(),
        upcoming_total,
        overdue,
        todays_classes,
        week: status.week_days(),
        progress,
    }
}

pub struct DashboardService {
    courses: Arc<dyn Repository<Course>>,
    assignments: Arc<dyn Repository<Assignment>>,
    classes: Arc<dyn Repository<Class>>,
}

impl DashboardService {
    pub fn new(
        courses: Arc<dyn Repository<Course>>,
        assignments: Arc<dyn Repository<Assignment>>,
        classes: Arc<dyn Repository<Class>>,
    ) -> Self {
        Self {
            courses,
            assignments,
            classes,
        }
    }

    pub async fn summary(&self, status: &DateStatus) -> Result<Dashboard, AppError> {
        let courses = self.courses.get_all().await?;
        let assignments = self.assignments.get_all().await?;
        let classes = self.classes.get_all().await?;
        Ok(build_dashboard(courses, &assignments, &classes, status))
    }
}
