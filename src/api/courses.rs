use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};
use crate::state::AppState;

pub(super) async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.grades().courses_with_grades().await?;
    Ok(Json(courses))
}

pub(super) async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = state.grades().course_with_grade(id).await?;
    Ok(Json(course))
}

pub(super) async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = state.planner().create_course(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    state.planner().update_course(id, req).await?;
    let course = state.grades().course_with_grade(id).await?;
    Ok(Json(course))
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.planner().delete_course(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
