//! Route definitions for the `/admin` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{admin, directory};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /guests        -> list_guests
/// PUT  /guests/{id}   -> update_guest
/// GET  /users         -> list_users
/// POST /users         -> create_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/guests", get(directory::list_guests))
        .route("/guests/{id}", put(directory::update_guest))
        .route("/users", get(admin::list_users).post(admin::create_user))
}
