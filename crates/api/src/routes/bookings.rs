use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookings, drafts};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET  /                -> list_active_bookings
/// POST /{id}/finalize   -> finalize_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::list_active_bookings))
        .route("/{id}/finalize", post(drafts::finalize_booking))
}
