use serde::{Deserialize, Serialize};

use crate::dates::parse_time;
use crate::error::AppError;
use crate::repository::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    #[default]
    Lecture,
    Lab,
    Seminar,
    Recitation,
    Tutorial,
}

/// A recurring weekly meeting of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(alias = "Id")]
    pub id: i64,
    pub course_id: i64,
    /// Sunday = 0 .. Saturday = 6.
    pub day_of_week: u8,
    /// `HH:MM`, 24h.
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub kind: ClassKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClassRequest {
    pub course_id: i64,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub kind: Option<ClassKind>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassRequest {
    pub course_id: Option<i64>,
    pub day_of_week: Option<u8>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ClassKind>,
}

impl Class {
    /// Normalises both times to `HH:MM` so they order as text.
    fn check_schedule(&mut self) -> Result<(), AppError> {
        if self.day_of_week > 6 {
            return Err(AppError::BadRequest(format!(
                "day of week must be 0-6, got {}",
                self.day_of_week
            )));
        }
        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;
        if start >= end {
            return Err(AppError::BadRequest(format!(
                "class must end after it starts ({} - {})",
                self.start_time, self.end_time
            )));
        }
        self.start_time = start.format("%H:%M").to_string();
        self.end_time = end.format("%H:%M").to_string();
        Ok(())
    }
}

impl Record for Class {
    type New = NewClassRequest;
    type Patch = UpdateClassRequest;

    const KIND: &'static str = "Class";

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, req: NewClassRequest) -> Result<Self, AppError> {
        let mut class = Class {
            id,
            course_id: req.course_id,
            day_of_week: req.day_of_week,
            start_time: req.start_time,
            end_time: req.end_time,
            location: req.location,
            kind: req.kind.unwrap_or_default(),
        };
        class.check_schedule()?;
        Ok(class)
    }

    fn apply(&mut self, req: UpdateClassRequest) -> Result<(), AppError> {
        if let Some(course_id) = req.course_id {
            self.course_id = course_id;
        }
        if let Some(day_of_week) = req.day_of_week {
            self.day_of_week = day_of_week;
        }
        if let Some(start_time) = req.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = req.end_time {
            self.end_time = end_time;
        }
        if let Some(location) = req.location {
            self.location = location;
        }
        if let Some(kind) = req.kind {
            self.kind = kind;
        }
        self.check_schedule()
    }

    fn validate(&mut self) -> Result<(), AppError> {
        self.check_schedule()
    }
}
