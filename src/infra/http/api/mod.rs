pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use reporting_api_types::API_PREFIX;

use crate::infra::http::middleware::log_responses;

pub fn build_api_router(state: ApiState) -> Router {
    let routes = Router::new()
        .route("/reportConfig", post(handlers::create_definition))
        .route("/reportConfigs", get(handlers::list_definitions))
        .route(
            "/reportConfigs/{id}",
            get(handlers::get_definition)
                .put(handlers::update_definition)
                .delete(handlers::delete_definition),
        )
        .route("/getDashboards", get(handlers::list_dashboards))
        .route("/health", get(handlers::health))
        .with_state(state);

    Router::new()
        .nest(API_PREFIX, routes)
        .layer(axum_middleware::from_fn(log_responses))
}
