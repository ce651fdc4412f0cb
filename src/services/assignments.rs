use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dates::{DateStatus, format_date};
use crate::models::{Assignment, AssignmentStatus, Course};

/// An assignment as the client shows it, with its due-date status resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub is_overdue: bool,
    pub days_until_due: i64,
    pub due_label: String,
    pub due_display: String,
}

impl AssignmentView {
    pub fn new(assignment: Assignment, status: &DateStatus) -> Self {
        let due = assignment.due_date;
        Self {
            is_overdue: status.is_overdue(due),
            days_until_due: status.days_until_due(due),
            due_label: status.label(due),
            due_display: format_date(due),
            assignment,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, status: AssignmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == AssignmentStatus::Pending,
            StatusFilter::InProgress => status == AssignmentStatus::InProgress,
            StatusFilter::Completed => status == AssignmentStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    DueDate,
    Course,
    Priority,
    Status,
    Title,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Filters and ordering for assignment listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuery {
    pub course_id: Option<i64>,
    #[serde(default)]
    pub status: StatusFilter,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl AssignmentQuery {
    fn keeps(&self, assignment: &Assignment) -> bool {
        let in_course = self.course_id.is_none_or(|id| assignment.course_id == id);
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => assignment.matches_search(needle),
            _ => true,
        };
        in_course && matches_search && self.status.matches(assignment.status)
    }

    /// Course-name sorting looks names up in `courses`; unknown courses
    /// sort as an empty name. Ties keep the incoming order.
    pub fn apply(&self, assignments: Vec<Assignment>, courses: &[Course], status: &DateStatus) -> Vec<AssignmentView> {
        let names: HashMap<i64, &str> = courses.iter().map(|c| (c.id, c.name.as_str())).collect();
        let course_name = |a: &Assignment| names.get(&a.course_id).copied().unwrap_or("");

        let mut kept: Vec<Assignment> = assignments.into_iter().filter(|a| self.keeps(a)).collect();
        kept.sort_by(|a, b| {
            let ordering = match self.sort {
                SortKey::DueDate => a.due_date.cmp(&b.due_date),
                SortKey::Course => course_name(a).cmp(course_name(b)),
                SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
                SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
                SortKey::Title => a.title.cmp(&b.title),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        kept.into_iter().map(|a| AssignmentView::new(a, status)).collect()
    }
}

/// Totals behind the status tabs of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn status_counts(assignments: &[Assignment]) -> StatusCounts {
    let count = |filter: StatusFilter| assignments.iter().filter(|a| filter.matches(a.status)).count();
    StatusCounts {
        all: assignments.len(),
        pending: count(StatusFilter::Pending),
        in_progress: count(StatusFilter::InProgress),
        completed: count(StatusFilter::Completed),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentList {
    pub counts: StatusCounts,
    pub assignments: Vec<AssignmentView>,
}
