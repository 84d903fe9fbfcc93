//! Handlers for the admin guest directory (`/admin/guests`).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use lodge_core::directory::{pair_with_additional, DirectoryEntry, DirectoryFilter};
use lodge_core::error::CoreError;
use lodge_core::guest::{ensure_submitted, validate_guest_fields, GuestFields};
use lodge_core::types::DbId;
use lodge_db::models::guest::Guest;
use lodge_db::repositories::GuestRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{AdminDirectoryArea, AdminGuestEditArea, Authorized};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /admin/guests`.
#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    pub search: Option<String>,
    pub document_type: Option<String>,
}

/// GET /api/v1/admin/guests?search=&document_type=
///
/// Every submitted main guest, newest first, each with its companions.
/// Companions of all listed guests are loaded with one query.
pub async fn list_guests(
    State(state): State<AppState>,
    _auth: Authorized<AdminDirectoryArea>,
    Query(params): Query<DirectoryQuery>,
) -> AppResult<Json<DataResponse<Vec<DirectoryEntry<Guest>>>>> {
    let filter = DirectoryFilter::from_params(params.search, params.document_type.as_deref())?;

    let main_guests = filter.apply(GuestRepo::list_submitted_main_guests(&state.pool).await?);

    let mut codes: Vec<String> = main_guests.iter().map(|g| g.booking_code.clone()).collect();
    codes.sort();
    codes.dedup();
    let additional = GuestRepo::list_submitted_additional_by_codes(&state.pool, &codes).await?;

    Ok(Json(DataResponse {
        data: pair_with_additional(main_guests, additional),
    }))
}

/// PUT /api/v1/admin/guests/{id}
///
/// Correct a submitted guest's fields. Drafts are not editable here; they
/// belong to their owner until finalized.
pub async fn update_guest(
    State(state): State<AppState>,
    auth: Authorized<AdminGuestEditArea>,
    Path(id): Path<DbId>,
    Json(input): Json<GuestFields>,
) -> AppResult<Json<Guest>> {
    let fields = validate_guest_fields("guest", input)?;

    let existing = GuestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Guest", id }))?;
    ensure_submitted(id, existing.status)?;

    let updated = GuestRepo::update_submitted(&state.pool, id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submitted guest",
            id,
        }))?;

    tracing::info!(admin_id = auth.session.user_id, guest_id = id, "Submitted guest updated");
    Ok(Json(updated))
}
