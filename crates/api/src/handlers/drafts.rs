//! Handlers for the caller's draft registrations and the finalize step.
//!
//! Row-level rules come from [`lodge_core::guest::ensure_draft_mutable`]:
//! a draft may be read, edited or deleted only by its owner, and only while
//! it is still a draft.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use lodge_core::error::CoreError;
use lodge_core::guest::{
    ensure_draft_mutable, ensure_finalize_owner, validate_guest_fields, GuestFields,
};
use lodge_core::types::DbId;
use lodge_db::models::guest::{Guest, GuestWithBooking};
use lodge_db::repositories::{BookingRepo, GuestRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{Authorized, EditDraftArea, ReviewArea};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of finalizing a booking's drafts.
#[derive(Debug, Serialize)]
pub struct FinalizeResponse {
    pub booking_id: DbId,
    pub submitted_count: i32,
}

fn guest_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Guest", id })
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// GET /api/v1/drafts
///
/// The caller's drafts with their bookings, main guests first.
pub async fn list_drafts(
    State(state): State<AppState>,
    auth: Authorized<ReviewArea>,
) -> AppResult<Json<DataResponse<Vec<GuestWithBooking>>>> {
    let drafts = GuestRepo::list_drafts_for_owner(&state.pool, auth.session.user_id).await?;
    Ok(Json(DataResponse { data: drafts }))
}

/// GET /api/v1/drafts/{id}
pub async fn get_draft(
    State(state): State<AppState>,
    auth: Authorized<EditDraftArea>,
    Path(id): Path<DbId>,
) -> AppResult<Json<GuestWithBooking>> {
    let draft = GuestRepo::find_with_booking(&state.pool, id)
        .await?
        .ok_or_else(|| guest_not_found(id))?;
    ensure_draft_mutable(&auth.session, id, draft.guest.user_id, draft.guest.status)?;
    Ok(Json(draft))
}

// ---------------------------------------------------------------------------
// Edit / delete
// ---------------------------------------------------------------------------

/// PUT /api/v1/drafts/{id}
///
/// Replace a draft's fields. The write is guarded by owner and status, so
/// a finalize that lands between the check and the write yields 404.
pub async fn update_draft(
    State(state): State<AppState>,
    auth: Authorized<EditDraftArea>,
    Path(id): Path<DbId>,
    Json(input): Json<GuestFields>,
) -> AppResult<Json<Guest>> {
    let fields = validate_guest_fields("guest", input)?;

    let existing = GuestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| guest_not_found(id))?;
    ensure_draft_mutable(&auth.session, id, existing.user_id, existing.status)?;

    let updated = GuestRepo::update_draft(&state.pool, id, auth.session.user_id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Draft guest",
            id,
        }))?;

    tracing::info!(user_id = auth.session.user_id, guest_id = id, "Draft guest updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/drafts/{id}
///
/// Delete one of the caller's drafts. Deleting a guest that no longer
/// exists succeeds. Returns 204 No Content.
pub async fn delete_draft(
    State(state): State<AppState>,
    auth: Authorized<EditDraftArea>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let Some(existing) = GuestRepo::find_by_id(&state.pool, id).await? else {
        return Ok(StatusCode::NO_CONTENT);
    };
    ensure_draft_mutable(&auth.session, id, existing.user_id, existing.status)?;

    if !GuestRepo::delete_draft(&state.pool, id, auth.session.user_id).await? {
        // Lost a race with finalize: report the row's current state.
        if let Some(current) = GuestRepo::find_by_id(&state.pool, id).await? {
            ensure_draft_mutable(&auth.session, id, current.user_id, current.status)?;
        }
    }

    tracing::info!(user_id = auth.session.user_id, guest_id = id, "Draft guest deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Finalize
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings/{id}/finalize
///
/// Submit every draft under the booking and mark the booking registered.
/// Irreversible. The booking must still be active and its drafts must all
/// belong to the caller. Fails with 404 when the caller has no drafts for
/// the booking, which includes a repeated finalize.
pub async fn finalize_booking(
    State(state): State<AppState>,
    auth: Authorized<ReviewArea>,
    Path(booking_id): Path<DbId>,
) -> AppResult<Json<FinalizeResponse>> {
    let user_id = auth.session.user_id;
    let not_active = || {
        AppError::Core(CoreError::NotFound {
            entity: "Active booking",
            id: booking_id,
        })
    };

    BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .filter(|b| b.is_active())
        .ok_or_else(not_active)?;

    let owners = GuestRepo::draft_owners_for_booking(&state.pool, booking_id).await?;
    ensure_finalize_owner(&auth.session, booking_id, &owners)?;

    let submitted_count = GuestRepo::finalize_booking(&state.pool, booking_id).await?;
    if submitted_count == 0 {
        // Registered by a concurrent finalize.
        return Err(not_active());
    }

    tracing::info!(user_id, booking_id, submitted_count, "Booking finalized");
    Ok(Json(FinalizeResponse {
        booking_id,
        submitted_count,
    }))
}
