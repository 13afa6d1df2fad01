use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::NaiveDate;
use infra::models::{GroundId, GroundRow, TimeSlot};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

pub async fn list_grounds(State(state): State<AppState>) -> Json<Vec<GroundRow>> {
    Json(state.bookings().catalog().list())
}

pub async fn get_ground(
    State(state): State<AppState>,
    ground_id: Result<Path<GroundId>, PathRejection>,
) -> Result<Json<GroundRow>, AppError> {
    let Path(ground_id) = ground_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    state
        .bookings()
        .catalog()
        .get(ground_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("ground {} not found", ground_id)))
}

pub async fn list_slots(
    State(state): State<AppState>,
    ground_id: Result<Path<GroundId>, PathRejection>,
    query: Result<Query<SlotsQuery>, QueryRejection>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let Path(ground_id) = ground_id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(state.bookings().slots(ground_id, query.date)?))
}
