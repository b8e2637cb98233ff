pub mod contact;
pub mod health;
pub mod static_files;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Environment;
use crate::error::AppError;
use crate::state::AppState;

/// Request bodies above this size are rejected before parsing.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Local development origins allowed to call the API with credentials.
pub const ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:8000",
    "http://127.0.0.1:8000",
    "http://localhost:5500",
    "http://localhost:3000",
];

/// Create the application router: API routes, static site, 404 fallback
pub fn create_router(state: AppState) -> Router {
    let environment = state.config.environment;
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .merge(contact::contact_routes(state.clone()))
        .merge(health::health_routes())
        .merge(static_files::static_routes(static_dir))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(
                    move |panic: Box<dyn Any + Send + 'static>| handle_panic(panic, environment),
                ))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer())
                .layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Fallback for anything no route or file matches
pub(crate) async fn not_found() -> AppError {
    AppError::NotFound
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");

    AppError::InternalError(detail)
        .with_environment(environment)
        .into_response()
}
