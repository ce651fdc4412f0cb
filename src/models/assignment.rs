use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{parse_date, serde_date};
use crate::error::AppError;
use crate::models::nullable;
use crate::repository::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::InProgress => "in-progress",
            AssignmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(alias = "Id")]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "serde_date")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: AssignmentStatus,
    pub category: String,
    /// Percentage in 0..=100; `None` while ungraded.
    #[serde(default)]
    pub grade: Option<f64>,
}

impl Assignment {
    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }

    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignmentRequest {
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub course_id: Option<i64>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<AssignmentStatus>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub grade: Option<Option<f64>>,
}

fn require_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("assignment title must not be empty".to_string()));
    }
    Ok(())
}

fn require_grade(grade: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&grade) {
        return Err(AppError::BadRequest(format!("invalid grade: {}", grade)));
    }
    Ok(())
}

impl Record for Assignment {
    type New = NewAssignmentRequest;
    type Patch = UpdateAssignmentRequest;

    const KIND: &'static str = "Assignment";

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, req: NewAssignmentRequest) -> Result<Self, AppError> {
        require_title(&req.title)?;
        let due_date = parse_date(&req.due_date)?;

        Ok(Assignment {
            id,
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            due_date,
            priority: req.priority.unwrap_or_default(),
            status: AssignmentStatus::Pending,
            category: req.category.unwrap_or_else(|| "Homework".to_string()),
            grade: None,
        })
    }

    fn apply(&mut self, req: UpdateAssignmentRequest) -> Result<(), AppError> {
        if let Some(title) = req.title {
            require_title(&title)?;
            self.title = title;
        }
        if let Some(due_date) = req.due_date {
            self.due_date = parse_date(&due_date)?;
        }
        if let Some(grade) = req.grade {
            if let Some(value) = grade {
                require_grade(value)?;
            }
            self.grade = grade;
        }
        if let Some(course_id) = req.course_id {
            self.course_id = course_id;
        }
        if let Some(description) = req.description {
            self.description = description;
        }
        if let Some(priority) = req.priority {
            self.priority = priority;
        }
        if let Some(status) = req.status {
            self.status = status;
        }
        if let Some(category) = req.category {
            self.category = category;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<(), AppError> {
        require_title(&self.title)?;
        match self.grade {
            Some(grade) => require_grade(grade),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_assignment() -> NewAssignmentRequest {
        NewAssignmentRequest {
            course_id: 1,
            title: "Problem Set 3".to_string(),
            description: Some("Eigenvalues".to_string()),
            due_date: "2026-10-20".to_string(),
            priority: None,
            category: None,
        }
    }

    #[test]
    fn test_create_fills_defaults() {
        let assignment = Assignment::create(4, new_assignment()).expect("Failed to create");
        assert_eq!(assignment.id, 4);
        assert_eq!(assignment.status, AssignmentStatus::Pending);
        assert_eq!(assignment.priority, Priority::Medium);
        assert_eq!(assignment.category, "Homework");
        assert_eq!(assignment.grade, None);
        assert_eq!(assignment.due_date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
    }

    #[test]
    fn test_create_rejects_malformed_due_date() {
        let mut req = new_assignment();
        req.due_date = "next tuesday".to_string();
        assert!(matches!(Assignment::create(1, req), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let mut assignment = Assignment::create(1, new_assignment()).unwrap();
        assignment.grade = Some(91.0);

        let untouched: UpdateAssignmentRequest =
            serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assignment.apply(untouched).unwrap();
        assert_eq!(assignment.grade, Some(91.0));
        assert!(assignment.is_completed());

        let cleared: UpdateAssignmentRequest = serde_json::from_str(r#"{"grade": null}"#).unwrap();
        assignment.apply(cleared).unwrap();
        assert_eq!(assignment.grade, None);
    }

    #[test]
    fn test_patch_rejects_negative_grade() {
        let mut assignment = Assignment::create(1, new_assignment()).unwrap();
        let patch = UpdateAssignmentRequest {
            grade: Some(Some(-3.0)),
            ..Default::default()
        };
        assert!(matches!(assignment.apply(patch), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_grade_must_be_a_percentage() {
        let mut assignment = Assignment::create(1, new_assignment()).unwrap();
        for bad in [100.5, f64::NAN, f64::INFINITY] {
            let patch = UpdateAssignmentRequest {
                grade: Some(Some(bad)),
                ..Default::default()
            };
            assert!(assignment.apply(patch).is_err(), "accepted {}", bad);
        }

        let patch = UpdateAssignmentRequest {
            grade: Some(Some(100.0)),
            ..Default::default()
        };
        assignment.apply(patch).unwrap();
        assert_eq!(assignment.grade, Some(100.0));

        assignment.grade = Some(140.0);
        assert!(assignment.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let status: AssignmentStatus = serde_json::from_str(r#""in-progress""#).unwrap();
        assert_eq!(status, AssignmentStatus::InProgress);
        assert_eq!(status.to_string(), "in-progress");
    }

    #[test]
    fn test_matches_search() {
        let assignment = Assignment::create(1, new_assignment()).unwrap();
        assert!(assignment.matches_search("problem"));
        assert!(assignment.matches_search("EIGEN"));
        assert!(!assignment.matches_search("essay"));
    }
}
