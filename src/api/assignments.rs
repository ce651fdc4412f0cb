use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{NewAssignmentRequest, UpdateAssignmentRequest};
use crate::services::{AssignmentList, AssignmentQuery, AssignmentView, status_counts};
use crate::state::AppState;

pub(super) async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<AssignmentList>, AppError> {
    let courses = state.courses.get_all().await?;
    let assignments = state.assignments.get_all().await?;

    let counts = status_counts(&assignments);
    let assignments = query.apply(assignments, &courses, &state.date_status());
    Ok(Json(AssignmentList { counts, assignments }))
}

pub(super) async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AssignmentView>, AppError> {
    let assignment = state.assignments.get_by_id(id).await?;
    Ok(Json(AssignmentView::new(assignment, &state.date_status())))
}

pub(super) async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<NewAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentView>), AppError> {
    let assignment = state.planner().create_assignment(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(AssignmentView::new(assignment, &state.date_status())),
    ))
}

pub(super) async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<AssignmentView>, AppError> {
    let assignment = state.planner().update_assignment(id, req).await?;
    Ok(Json(AssignmentView::new(assignment, &state.date_status())))
}

pub(super) async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.planner().delete_assignment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
