//! Bare static server for checking the site without the mail stack

use std::path::Path;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::api::static_files::static_routes;

/// Files the portfolio front end is expected to ship.
pub const SITE_FILES: [&str; 3] = ["index.html", "styles.css", "script.js"];

#[derive(Debug, Serialize)]
pub struct SelfTestResponse {
    pub message: String,
    pub files: Vec<String>,
}

pub fn debug_router(static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/test", get(self_test))
        .merge(static_routes(static_dir))
        .layer(TraceLayer::new_for_http())
}

/// GET /test
async fn self_test() -> Json<SelfTestResponse> {
    Json(SelfTestResponse {
        message: "Server is working!".to_string(),
        files: SITE_FILES.iter().map(|f| f.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn router() -> Router {
        debug_router(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/site"))
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_self_test_endpoint() {
        let (status, body) = get("/test").await;
        let body: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "message": "Server is working!",
                "files": ["index.html", "styles.css", "script.js"]
            })
        );
    }

    #[tokio::test]
    async fn test_serves_site() {
        let (status, body) = get("/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("<title>Portfolio</title>"));
    }
}
