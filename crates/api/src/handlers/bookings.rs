//! Handlers for the `/bookings` resource.

use axum::extract::State;
use axum::Json;
use lodge_db::models::booking::Booking;
use lodge_db::repositories::BookingRepo;

use crate::error::AppResult;
use crate::middleware::rbac::{Authorized, RegisterArea};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/bookings
///
/// Bookings open for registration, earliest check-in first.
pub async fn list_active_bookings(
    State(state): State<AppState>,
    _auth: Authorized<RegisterArea>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings = BookingRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: bookings }))
}
