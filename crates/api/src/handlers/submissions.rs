//! Handlers for the `/submissions` resource.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use lodge_core::grouping::{group_submissions, SubmissionGroup};
use lodge_core::types::DbId;
use lodge_db::models::booking::Booking;
use lodge_db::models::guest::{Guest, GuestWithBooking};
use lodge_db::repositories::{GuestRepo, ProfileRepo};

use crate::error::AppResult;
use crate::middleware::rbac::{Authorized, SubmissionsArea};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/submissions
///
/// Finalized registrations grouped by booking id. Ordinary users see their
/// own; administrators see everyone's, annotated with the submitter's name.
/// The guest rows and the profile directory are fetched concurrently.
pub async fn list_submissions(
    State(state): State<AppState>,
    auth: Authorized<SubmissionsArea>,
) -> AppResult<Json<DataResponse<BTreeMap<DbId, SubmissionGroup<Booking, Guest>>>>> {
    let session = auth.session;
    let pool = &state.pool;

    let directory = async {
        if session.is_admin() {
            ProfileRepo::directory(pool).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let (rows, directory) = tokio::try_join!(
        GuestRepo::list_submitted(pool, session.owner_scope()),
        directory,
    )?;

    let row_count = rows.len();
    let groups = group_submissions(
        rows.into_iter().map(GuestWithBooking::into_parts),
        directory.as_ref(),
    );

    tracing::debug!(
        user_id = session.user_id,
        row_count,
        group_count = groups.len(),
        "Listed submissions",
    );
    Ok(Json(DataResponse { data: groups }))
}
