use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use infra::models::{BookingRow, GroundId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::booking::hour_of_day;
use crate::services::{CreateBooking, Quote};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    pub booking: BookingRow,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub booking: BookingRow,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub ground_id: GroundId,
    pub date: NaiveDate,
    #[serde(deserialize_with = "hour_of_day")]
    pub start_time: u8,
    pub duration: u8,
}

fn parse_booking_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| AppError::BadRequest(format!("invalid booking id: {}", e)))
}

pub async fn create_booking(
    State(state): State<AppState>,
    body: Result<Json<CreateBooking>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    // Reserving may wait on a contended day shard; keep that off the async workers.
    let service = state.bookings().clone();
    let booking = tokio::task::spawn_blocking(move || service.create_booking(req))
        .await
        .map_err(|e| AppError::Internal(format!("booking task failed: {}", e)))??;
    Ok((StatusCode::CREATED, Json(BookingResponse { booking })))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    let id = parse_booking_id(&booking_id)?;
    let booking = state.bookings().get_booking(id)?;
    Ok(Json(BookingResponse { booking }))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    let id = parse_booking_id(&booking_id)?;
    let booking = state.bookings().cancel_booking(id)?;
    Ok(Json(CancelResponse {
        success: true,
        booking,
    }))
}

pub async fn quote_booking(
    State(state): State<AppState>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let quote = state
        .bookings()
        .quote(req.ground_id, req.date, req.start_time, req.duration)?;
    Ok(Json(quote))
}
