use axum::routing::get;
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(submissions::list_submissions))
}
