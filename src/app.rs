use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/counters/:namespace/:key", get(handlers::get_counter))
        .fallback(handlers::serve_page)
        .with_state(state)
}
