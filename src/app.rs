use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/reload", post(handlers::reload))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/trends", get(handlers::get_trends))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
