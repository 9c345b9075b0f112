use axum::routing::get;
use axum::Router;

use crate::handlers::adjustment;
use crate::state::AppState;

/// Routes mounted at `/adjustments`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(adjustment::list).post(adjustment::upsert))
        .route("/{id}", get(adjustment::get_by_id).delete(adjustment::delete))
}
