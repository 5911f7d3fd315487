pub mod auth;
pub mod crm;
pub mod health;
pub mod intelligence;

use axum::{
    Json, Router,
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/request-reset", post(auth::request_reset))
        .route("/auth/reset-password", post(auth::reset_password))
        // Generation
        .route(
            "/generate-intelligence",
            post(intelligence::generate_intelligence),
        )
        // CRM
        .route("/crm/save", post(crm::save_record))
        .route("/crm/records", get(crm::list_records))
        .with_state(state)
}

/// `{ "error": message }` with the given status
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Decode a JSON request body whatever its `Content-Type`.
///
/// Browsers posting `JSON.stringify(..)` without headers send
/// `text/plain;charset=UTF-8`, so the declared type is not checked. An empty
/// body decodes to `T::default()`.
pub(crate) fn parse_json_body<T: DeserializeOwned + Default>(
    body: &Bytes,
) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

/// Unreadable bodies are treated like empty ones so validation answers with 400
pub(crate) fn body_or_default<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    parse_json_body(body).unwrap_or_else(|e| {
        tracing::debug!("Unreadable request body: {}", e);
        T::default()
    })
}
