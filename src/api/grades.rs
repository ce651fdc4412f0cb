use axum::Json;
use axum::extract::{Path, State};

use crate::error::AppError;
use crate::services::{CourseBreakdown, Dashboard, GradeReport};
use crate::state::AppState;

pub(super) async fn grade_report(State(state): State<AppState>) -> Result<Json<GradeReport>, AppError> {
    let report = state.grades().report().await?;
    Ok(Json(report))
}

pub(super) async fn course_grade(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseBreakdown>, AppError> {
    let breakdown = state.grades().course_breakdown(id).await?;
    Ok(Json(breakdown))
}

pub(super) async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let dashboard = state.dashboard().summary(&state.date_status()).await?;
    Ok(Json(dashboard))
}
