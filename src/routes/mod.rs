use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::require_auth;
use crate::state::AppState;

pub mod feed;
pub mod subscriptions;
pub mod watch_status;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/feed", get(feed::feed))
        .route(
            "/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route("/subscriptions/preview", post(subscriptions::preview))
        .route(
            "/subscriptions/:subscription_id",
            get(subscriptions::get_subscription)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .route(
            "/watch-status",
            post(watch_status::create).delete(watch_status::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
