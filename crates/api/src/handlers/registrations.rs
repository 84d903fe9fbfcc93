//! Handlers for the `/registrations` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use lodge_core::error::CoreError;
use lodge_core::guest::{validate_registration, RegistrationRequest};
use lodge_db::models::guest::{CreateDraftGroup, Guest};
use lodge_db::repositories::{BookingRepo, GuestRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{Authorized, RegisterArea};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/registrations
///
/// Save a main guest and its companions as drafts against an active
/// booking. Everything is validated before the first write, and the rows
/// are inserted in one transaction. A booking holds one main guest, so a
/// second registration against it is a 409. Returns 201 with the created
/// guests, main guest first.
pub async fn create_registration(
    State(state): State<AppState>,
    auth: Authorized<RegisterArea>,
    Json(input): Json<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Guest>>>)> {
    let registration = validate_registration(input)?;

    let booking = BookingRepo::find_by_id(&state.pool, registration.booking_id)
        .await?
        .filter(|b| b.is_active())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Active booking",
            id: registration.booking_id,
        }))?;

    if GuestRepo::has_main_guest(&state.pool, booking.id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Booking {} already has a registered main guest",
            booking.code
        ))));
    }

    let guest_count = registration.guest_count();
    let guests = GuestRepo::create_draft_group(
        &state.pool,
        &CreateDraftGroup {
            booking_id: booking.id,
            booking_code: booking.code,
            user_id: auth.session.user_id,
            main_guest: registration.main_guest,
            additional_guests: registration.additional_guests,
        },
    )
    .await?;

    tracing::info!(
        user_id = auth.session.user_id,
        booking_id = booking.id,
        guest_count,
        "Registration saved as draft",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: guests })))
}
