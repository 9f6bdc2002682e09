use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::{models::BookingModel, types::BookingRequest};
use crate::database::{parse_id, DeleteResult, InsertResult};
use crate::shared::{AppError, AppState, EmailQuery};

/// POST /userTest
#[instrument(name = "create_booking", skip(state, request), fields(email = %request.email))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<InsertResult>, AppError> {
    let booking = BookingModel::new(request);
    state.booking_repository.create_booking(&booking).await?;

    info!(booking_id = %booking.id, test_id = ?booking.test_id, "Booking created");
    Ok(Json(InsertResult::new(booking.id)))
}

/// GET /userTest?email=
///
/// Without an email nothing matches
#[instrument(name = "list_bookings", skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<BookingModel>>, AppError> {
    let bookings = match query.email.as_deref() {
        Some(email) => state.booking_repository.list_bookings_by_email(email).await?,
        None => Vec::new(),
    };
    Ok(Json(bookings))
}

/// GET /userSingleTest
#[instrument(name = "list_all_bookings", skip(state))]
pub async fn list_all_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingModel>>, AppError> {
    let bookings = state.booking_repository.list_bookings().await?;
    info!(booking_count = bookings.len(), "Bookings listed successfully");
    Ok(Json(bookings))
}

/// DELETE /userTest/:id
#[instrument(name = "delete_booking", skip(state))]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let deleted = match parse_id(&id) {
        Some(id) => state.booking_repository.delete_booking(id).await?,
        None => {
            warn!(id = %id, "Malformed booking id");
            0
        }
    };

    info!(id = %id, deleted, "Booking delete finished");
    Ok(Json(DeleteResult::deleted(deleted)))
}
