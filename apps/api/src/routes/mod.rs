pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::opportunities::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/opportunities",
            get(handlers::handle_list_opportunities),
        )
        .route(
            "/api/v1/opportunities/search",
            post(handlers::handle_search_opportunities),
        )
        .route(
            "/api/v1/opportunities/categories",
            get(handlers::handle_category_summary),
        )
        .route(
            "/api/v1/opportunities/refresh",
            post(handlers::handle_refresh),
        )
        .with_state(state)
}
