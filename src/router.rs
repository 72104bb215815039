use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{AppState, middleware::log_errors, routes};

// 直播状态路由，/api/live 为兼容旧入口的别名
pub fn stream_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stream", get(routes::stream::get_stream_status))
        .route("/api/live", get(routes::stream::get_stream_status))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(stream_routes())
        .route("/health", get(routes::health::health))
        .layer(axum::middleware::from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        // 浏览器挂件跨域访问
        .layer(CorsLayer::permissive())
        .with_state(state)
}
