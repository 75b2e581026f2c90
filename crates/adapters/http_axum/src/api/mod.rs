//! JSON API handler modules.

pub mod triggers;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/triggers", get(triggers::list))
        .route("/triggers/events", get(triggers::list_events))
        .route("/triggers/windows", get(triggers::list_windows))
}
