use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    middleware::logging,
    openapi::ApiDoc,
    routes::{classes, classroom, health, messages, threads, users, votes},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Users
        .route("/users", post(users::register_user))
        // Classes
        .route("/classes", post(classes::create_class))
        .route("/classroom/classes", post(classroom::fetch_classroom_classes))
        // Threads
        .route("/threads", post(threads::create_thread))
        .route("/threads/:thread_id/resolve", post(threads::resolve_thread))
        // Messages
        .route("/messages", post(messages::create_message))
        // Votes
        .route("/votes/threads", put(votes::cast_thread_votes))
        .route("/votes/messages", put(votes::cast_message_votes));

    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<axum::http::HeaderValue> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        // No allowed origins: browsers refuse cross-origin calls.
        CorsLayer::new()
    }
}
