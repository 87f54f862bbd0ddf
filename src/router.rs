use axum::http::{HeaderValue, Method};
use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;

use crate::docs::openapi_json;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, render_metrics};
use crate::middleware::errors::{error_boundary, fallback, method_not_allowed};
use crate::modules::answers::router::init_answers_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::router::init_health_router;
use crate::modules::questions::router::init_questions_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/metrics", get(render_metrics))
        .nest(
            "/api",
            Router::new()
                .nest("/health", init_health_router())
                .nest("/auth", init_auth_router(state.clone()))
                .nest("/questions", init_questions_router(state.clone()))
                .nest("/answers", init_answers_router(state.clone())),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(fallback)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state.clone(), error_boundary))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
}
