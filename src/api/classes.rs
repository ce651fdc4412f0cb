use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::dates::{WeekDay, format_time};
use crate::error::AppError;
use crate::models::{Class, NewClassRequest, UpdateClassRequest};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClassQueryParams {
    course_id: Option<i64>,
    day: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ClassView {
    #[serde(flatten)]
    class: Class,
    start_display: String,
    end_display: String,
}

impl ClassView {
    fn new(class: Class) -> Result<Self, AppError> {
        Ok(Self {
            start_display: format_time(&class.start_time)?,
            end_display: format_time(&class.end_time)?,
            class,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WeekSchedule {
    days: Vec<WeekDay>,
    classes: Vec<ClassView>,
}

fn in_week_order(mut classes: Vec<Class>) -> Result<Vec<ClassView>, AppError> {
    classes.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    classes.into_iter().map(ClassView::new).collect()
}

pub(super) async fn list_classes(
    State(state): State<AppState>,
    Query(params): Query<ClassQueryParams>,
) -> Result<Json<Vec<ClassView>>, AppError> {
    let classes: Vec<Class> = state
        .classes
        .get_all()
        .await?
        .into_iter()
        .filter(|c| params.course_id.is_none_or(|id| c.course_id == id))
        .filter(|c| params.day.is_none_or(|day| c.day_of_week == day))
        .collect();
    Ok(Json(in_week_order(classes)?))
}

pub(super) async fn week(State(state): State<AppState>) -> Result<Json<WeekSchedule>, AppError> {
    let classes = state.classes.get_all().await?;
    Ok(Json(WeekSchedule {
        days: state.date_status().week_days(),
        classes: in_week_order(classes)?,
    }))
}

pub(super) async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClassView>, AppError> {
    let class = state.classes.get_by_id(id).await?;
    Ok(Json(ClassView::new(class)?))
}

pub(super) async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<ClassView>), AppError> {
    let class = state.planner().create_class(req).await?;
    Ok((StatusCode::CREATED, Json(ClassView::new(class)?)))
}

pub(super) async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<ClassView>, AppError> {
    let class = state.planner().update_class(id, req).await?;
    Ok(Json(ClassView::new(class)?))
}

pub(super) async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.planner().delete_class(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
