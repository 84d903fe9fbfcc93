pub mod admin;
pub mod auth;
pub mod bookings;
pub mod drafts;
pub mod health;
pub mod registrations;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout
/// /auth/me                         current user
///
/// /bookings                        active bookings
/// /bookings/{id}/finalize          submit the caller's drafts (POST)
/// /registrations                   save a registration as drafts (POST)
/// /drafts                          the caller's drafts
/// /drafts/{id}                     get, update, delete one draft
/// /submissions                     finalized registrations by booking
///
/// /admin/guests                    directory of submitted guests (admin)
/// /admin/guests/{id}               edit a submitted guest (admin)
/// /admin/users                     list, create staff accounts (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/bookings", bookings::router())
        .nest("/registrations", registrations::router())
        .nest("/drafts", drafts::router())
        .nest("/submissions", submissions::router())
        .nest("/admin", admin::router())
}
