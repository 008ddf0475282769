use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::handlers;
use crate::api::handlers::a001_log_analysis::AppState;
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let static_dir = ServeDir::new(&state.server.static_dir);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // A001 LOG ANALYSIS
        // ========================================
        .route(
            "/api/analyze",
            post(handlers::a001_log_analysis::analyze),
        )
        .route("/api/chat", post(handlers::a001_log_analysis::chat))
        .with_state(state)
        .fallback_service(static_dir)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}
