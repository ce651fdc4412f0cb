use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{
    Assignment, Class, Course, NewAssignmentRequest, NewClassRequest, NewCourseRequest, UpdateAssignmentRequest,
    UpdateClassRequest, UpdateCourseRequest,
};
use crate::repository::Repository;

/// Writes that touch more than one collection: course references are
/// checked, assignment categories are held to their course's categories,
/// and deleting a course removes what hangs off it.
pub struct PlannerService {
    courses: Arc<dyn Repository<Course>>,
    assignments: Arc<dyn Repository<Assignment>>,
    classes: Arc<dyn Repository<Class>>,
}

impl PlannerService {
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

    /// A dangling course id is the caller's mistake, not a missing resource.
    async fn referenced_course(&self, course_id: i64) -> Result<Course, AppError> {
        match self.courses.get_by_id(course_id).await {
            Err(AppError::NotFound(_)) => Err(AppError::BadRequest(format!("unknown course id {}", course_id))),
            other => other,
        }
    }

    fn check_category(course: &Course, category: &str) -> Result<(), AppError> {
        // A course without categories has no grade to protect.
        if course.grade_categories.is_empty() || course.has_category(category) {
            return Ok(());
        }
        Err(AppError::BadRequest(format!(
            "category {} is not one of {}'s grade categories",
            category, course.code
        )))
    }

    pub async fn create_course(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        self.courses.create(req).await
    }

    /// Shrinking the category list is allowed. Assignments left outside it
    /// show up as unmatched in the grade breakdown.
    pub async fn update_course(&self, id: i64, req: UpdateCourseRequest) -> Result<Course, AppError> {
        let course = self.courses.update(id, req).await?;
        let orphaned = self
            .assignments
            .get_all()
            .await?
            .into_iter()
            .filter(|a| a.course_id == id && Self::check_category(&course, &a.category).is_err())
            .count();
        if orphaned > 0 {
            warn!("{} assignments of course {} no longer match a category", orphaned, course.code);
        }
        Ok(course)
    }

    pub async fn delete_course(&self, id: i64) -> Result<(), AppError> {
        self.courses.delete(id).await?;

        let mut removed = 0;
        for assignment in self.assignments.get_all().await? {
            if assignment.course_id == id {
                self.assignments.delete(assignment.id).await?;
                removed += 1;
            }
        }
        for class in self.classes.get_all().await? {
            if class.course_id == id {
                self.classes.delete(class.id).await?;
                removed += 1;
            }
        }
        info!("deleted course {} and {} dependent records", id, removed);
        Ok(())
    }

    pub async fn create_assignment(&self, mut req: NewAssignmentRequest) -> Result<Assignment, AppError> {
        let course = self.referenced_course(req.course_id).await?;
        let category = req.category.take().unwrap_or_else(|| course.default_category());
        Self::check_category(&course, &category)?;
        req.category = Some(category);
        self.assignments.create(req).await
    }

    pub async fn update_assignment(&self, id: i64, req: UpdateAssignmentRequest) -> Result<Assignment, AppError> {
        let current = self.assignments.get_by_id(id).await?;
        let course_id = req.course_id.unwrap_or(current.course_id);
        let category = req.category.as_deref().unwrap_or(&current.category);

        if req.course_id.is_some() || req.category.is_some() {
            let course = self.referenced_course(course_id).await?;
            Self::check_category(&course, category)?;
        }
        self.assignments.update(id, req).await
    }

    pub async fn delete_assignment(&self, id: i64) -> Result<(), AppError> {
        self.assignments.delete(id).await
    }

    pub async fn create_class(&self, req: NewClassRequest) -> Result<Class, AppError> {
        self.referenced_course(req.course_id).await?;
        self.classes.create(req).await
    }

    pub async fn update_class(&self, id: i64, req: UpdateClassRequest) -> Result<Class, AppError> {
        if let Some(course_id) = req.course_id {
            self.referenced_course(course_id).await?;
        }
        self.classes.update(id, req).await
    }

    pub async fn delete_class(&self, id: i64) -> Result<(), AppError> {
        self.classes.delete(id).await
    }
}
