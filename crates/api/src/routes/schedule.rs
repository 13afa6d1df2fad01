use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::NaiveDate;
use infra::models::{BookingRow, GroundId};
use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::AppError;
use crate::services::WeekGrid;
use crate::state::AppState;

/// Query values may be present but blank (`?ground_id=&from=`); treat those as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Deserialize)]
pub struct ScheduleQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub ground_id: Option<GroundId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub from: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct WeekQuery {
    pub ground_id: GroundId,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub start: Option<NaiveDate>,
}

pub async fn get_schedule(
    State(state): State<AppState>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<Vec<BookingRow>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let viewer = state.schedule();
    let (from, to) = viewer.resolve_range(query.from, query.to)?;
    Ok(Json(viewer.get_schedule(query.ground_id, from, to)?))
}

pub async fn get_week(
    State(state): State<AppState>,
    query: Result<Query<WeekQuery>, QueryRejection>,
) -> Result<Json<WeekGrid>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let viewer = state.schedule();
    let (start, _) = viewer.resolve_range(query.start, None)?;
    Ok(Json(viewer.week_grid(query.ground_id, start)?))
}
