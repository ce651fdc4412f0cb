use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::repository::Record;

/// Tolerance when checking that category weights add up to 100.
const WEIGHT_TOLERANCE: f64 = 0.01;

/// Most credits a single course may carry.
pub const MAX_CREDITS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCategory {
    pub name: String,
    pub weight: f64,
}

impl GradeCategory {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Categories a course gets when it is created without any.
pub fn default_grade_categories() -> Vec<GradeCategory> {
    vec![
        GradeCategory::new("Homework", 20.0),
        GradeCategory::new("Quizzes", 15.0),
        GradeCategory::new("Midterm", 25.0),
        GradeCategory::new("Final", 40.0),
    ]
}

/// An empty list is allowed. Otherwise names must be unique and non-blank,
/// weights positive, and the total 100.
pub fn validate_grade_categories(categories: &[GradeCategory]) -> Result<(), AppError> {
    if categories.is_empty() {
        return Ok(());
    }

    let mut seen: Vec<&str> = Vec::with_capacity(categories.len());
    for category in categories {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("grade category name must not be empty".to_string()));
        }
        if seen.contains(&name) {
            return Err(AppError::BadRequest(format!("duplicate grade category: {}", name)));
        }
        if !category.weight.is_finite() || category.weight <= 0.0 {
            return Err(AppError::BadRequest(format!(
                "grade category {} must have a positive weight",
                name
            )));
        }
        seen.push(name);
    }

    let total: f64 = categories.iter().map(|c| c.weight).sum();
    if (total - 100.0).abs() > WEIGHT_TOLERANCE {
        return Err(AppError::BadRequest(format!(
            "grade category weights must sum to 100, got {}",
            total
        )));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(alias = "Id")]
    pub id: i64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub instructor: String,
    pub credits: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub grade_categories: Vec<GradeCategory>,
    /// Derived from assignments on read; see `services::grading`.
    #[serde(default)]
    pub current_grade: Option<f64>,
}

impl Course {
    pub fn has_category(&self, name: &str) -> bool {
        self.grade_categories.iter().any(|c| c.name == name)
    }

    /// Category used for a new assignment that names none.
    pub fn default_category(&self) -> String {
        if self.grade_categories.is_empty() || self.has_category("Homework") {
            return "Homework".to_string();
        }
        self.grade_categories[0].name.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub instructor: String,
    pub credits: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub semester: String,
    pub grade_categories: Option<Vec<GradeCategory>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub instructor: Option<String>,
    pub credits: Option<u32>,
    pub color: Option<String>,
    pub semester: Option<String>,
    pub grade_categories: Option<Vec<GradeCategory>>,
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("course {} must not be empty", field)));
    }
    Ok(())
}

fn require_credits(credits: u32) -> Result<(), AppError> {
    if credits == 0 || credits > MAX_CREDITS {
        return Err(AppError::BadRequest(format!(
            "course credits must be between 1 and {}, got {}",
            MAX_CREDITS, credits
        )));
    }
    Ok(())
}

impl Record for Course {
    type New = NewCourseRequest;
    type Patch = UpdateCourseRequest;

    const KIND: &'static str = "Course";

    fn id(&self) -> i64 {
        self.id
    }

    fn create(id: i64, req: NewCourseRequest) -> Result<Self, AppError> {
        require_text("name", &req.name)?;
        require_text("code", &req.code)?;
        require_credits(req.credits)?;
        let grade_categories = req.grade_categories.unwrap_or_else(default_grade_categories);
        validate_grade_categories(&grade_categories)?;

        Ok(Course {
            id,
            name: req.name,
            code: req.code,
            instructor: req.instructor,
            credits: req.credits,
            color: req.color,
            semester: req.semester,
            grade_categories,
            current_grade: None,
        })
    }

    fn apply(&mut self, req: UpdateCourseRequest) -> Result<(), AppError> {
        if let Some(name) = req.name {
            require_text("name", &name)?;
            self.name = name;
        }
        if let Some(code) = req.code {
            require_text("code", &code)?;
            self.code = code;
        }
        if let Some(instructor) = req.instructor {
            self.instructor = instructor;
        }
        if let Some(credits) = req.credits {
            require_credits(credits)?;
            self.credits = credits;
        }
        if let Some(color) = req.color {
            self.color = color;
        }
        if let Some(semester) = req.semester {
            self.semester = semester;
        }
        if let Some(grade_categories) = req.grade_categories {
            validate_grade_categories(&grade_categories)?;
            self.grade_categories = grade_categories;
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<(), AppError> {
        require_text("name", &self.name)?;
        require_text("code", &self.code)?;
        require_credits(self.credits)?;
        validate_grade_categories(&self.grade_categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_course() -> NewCourseRequest {
        NewCourseRequest {
            name: "Linear Algebra".to_string(),
            code: "MATH 221".to_string(),
            instructor: "Dr. Okafor".to_string(),
            credits: 4,
            color: "#4f46e5".to_string(),
            semester: "Fall 2026".to_string(),
            grade_categories: None,
        }
    }

    #[test]
    fn test_create_uses_default_categories() {
        let course = Course::create(1, new_course()).expect("Failed to create course");
        assert_eq!(course.grade_categories, default_grade_categories());
        assert_eq!(course.current_grade, None);
        assert_eq!(course.default_category(), "Homework");
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let mut req = new_course();
        req.grade_categories = Some(vec![
            GradeCategory::new("Homework", 30.0),
            GradeCategory::new("Final", 30.0),
        ]);
        assert!(matches!(Course::create(1, req), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_duplicate_and_non_positive_categories() {
        let duplicate = [GradeCategory::new("Final", 50.0), GradeCategory::new("Final", 50.0)];
        assert!(validate_grade_categories(&duplicate).is_err());

        let negative = [GradeCategory::new("Homework", 120.0), GradeCategory::new("Final", -20.0)];
        assert!(validate_grade_categories(&negative).is_err());

        assert!(validate_grade_categories(&[]).is_ok());
    }

    #[test]
    fn test_apply_rejects_zero_credits_and_keeps_state() {
        let mut course = Course::create(1, new_course()).unwrap();
        let patch = UpdateCourseRequest {
            credits: Some(0),
            ..Default::default()
        };
        assert!(course.apply(patch).is_err());
        assert_eq!(course.credits, 4);
    }

    #[test]
    fn test_credits_are_bounded() {
        let mut req = new_course();
        req.credits = MAX_CREDITS + 1;
        assert!(matches!(Course::create(1, req), Err(AppError::BadRequest(_))));

        let mut req = new_course();
        req.credits = MAX_CREDITS;
        assert!(Course::create(1, req).is_ok());

        let mut course = Course::create(1, new_course()).unwrap();
        let patch = UpdateCourseRequest {
            credits: Some(u32::MAX),
            ..Default::default()
        };
        assert!(course.apply(patch).is_err());
    }

    #[test]
    fn test_validate_checks_records_built_outside_create() {
        let mut course = Course::create(1, new_course()).unwrap();
        assert!(course.validate().is_ok());

        course.grade_categories = vec![GradeCategory::new("Homework", 30.0), GradeCategory::new("Homework", -10.0)];
        assert!(course.validate().is_err());
    }

    #[test]
    fn test_default_category_without_homework() {
        let mut req = new_course();
        req.grade_categories = Some(vec![
            GradeCategory::new("Labs", 40.0),
            GradeCategory::new("Exam", 60.0),
        ]);
        let course = Course::create(1, req).unwrap();
        assert_eq!(course.default_category(), "Labs");
    }

    #[test]
    fn test_deserializes_legacy_id_field() {
        let json = r#"{"Id": 7, "name": "Chemistry", "code": "CHEM 101", "credits": 3,
            "gradeCategories": [{"name": "Labs", "weight": 100}], "currentGrade": 88.5}"#;
        let course: Course = serde_json::from_str(json).expect("Failed to parse course");
        assert_eq!(course.id, 7);
        assert_eq!(course.current_grade, Some(88.5));
        assert_eq!(course.grade_categories[0].weight, 100.0);
    }
}
