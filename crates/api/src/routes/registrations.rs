use axum::routing::post;
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(registrations::create_registration))
}
