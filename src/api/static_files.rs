//! Static site hosting

use std::path::Path;

use axum::{
    extract::Request,
    handler::HandlerWithoutStateExt,
    http::{header::CONTENT_TYPE, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::services::ServeDir;

use crate::error::AppError;

use super::not_found;

/// Serve `dir` for every path no other route claims.
/// Missing files and non-GET requests get the JSON 404.
pub fn static_routes<S>(dir: impl AsRef<Path>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let serve_dir = ServeDir::new(dir.as_ref())
        .call_fallback_on_method_not_allowed(true)
        .fallback(not_found.into_service());

    Router::new()
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(static_headers))
}

/// Hides dot-files and pins the content type of stylesheets and scripts.
async fn static_headers(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if is_hidden(&path) {
        return AppError::NotFound.into_response();
    }

    let mut response = next.run(request).await;

    if response.status().is_success() {
        if let Some(content_type) = content_type_for(&path) {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    response
}

fn is_hidden(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.') || segment.to_ascii_lowercase().starts_with("%2e")
    })
}

fn content_type_for(path: &str) -> Option<&'static str> {
    if path.ends_with(".css") {
        Some("text/css")
    } else if path.ends_with(".js") {
        Some("application/javascript")
    } else {
        None
    }
}
