use axum::{
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    middleware,
    routing::post,
    Form, Json, Router,
};

use crate::error::{AppError, ErrorResponse};
use crate::models::{ContactRequest, ContactResponse};
use crate::rate_limit;
use crate::state::AppState;
use crate::validation;

use super::not_found;

const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

/// Contact routes, rate limited per client address
pub fn contact_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit_contact).fallback(not_found))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit::limit_submissions,
        ))
}

/// Contact payload from either a JSON or a urlencoded form body.
/// Bodies of any other type are ignored.
pub struct ContactForm(pub ContactRequest);

impl<S> FromRequest<S> for ContactForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(request) = Form::<ContactRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(request))
        } else if is_json(&content_type) {
            let Json(request) = Json::<ContactRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self(request))
        } else {
            Ok(Self(ContactRequest::default()))
        }
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence == "application/json" || essence.ends_with("+json")
}

/// POST /api/contact - Validate a submission and relay it by email
async fn submit_contact(
    State(state): State<AppState>,
    ContactForm(request): ContactForm,
) -> Result<Json<ContactResponse>, ErrorResponse> {
    let environment = state.config.environment;

    let submission = validation::validate(request)
        .map_err(|e| AppError::from(e).with_environment(environment))?;

    let delivery = state
        .mailer
        .deliver(&submission)
        .await
        .map_err(|e| AppError::from(e).with_environment(environment))?;

    Ok(Json(ContactResponse {
        success: true,
        message: SUCCESS_MESSAGE.to_string(),
        message_id: delivery.message_id,
        preview_url: delivery.preview_url,
    }))
}
