//! Route definitions for the `/drafts` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::drafts;
use crate::state::AppState;

/// Routes mounted at `/drafts`.
///
/// ```text
/// GET    /       -> list_drafts
/// GET    /{id}   -> get_draft
/// PUT    /{id}   -> update_draft
/// DELETE /{id}   -> delete_draft
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(drafts::list_drafts)).route(
        "/{id}",
        get(drafts::get_draft)
            .put(drafts::update_draft)
            .delete(drafts::delete_draft),
    )
}
