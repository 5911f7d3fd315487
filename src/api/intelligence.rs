use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{error_response, parse_json_body};
use crate::infrastructure::AppState;
use crate::intelligence::{GenerationError, GenerationRequest};

fn generation_error_response(err: GenerationError) -> Response {
    match err {
        GenerationError::InvalidInput(msg) => {
            tracing::debug!("Rejected generation request: {}", msg);
            error_response(StatusCode::BAD_REQUEST, msg)
        }
        GenerationError::MissingApiKey => {
            tracing::error!("Missing OPENAI_API_KEY in environment");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        other => {
            tracing::error!("Error in generate-intelligence: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate intelligence pack (check server logs)",
            )
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/generate-intelligence",
    responses(
        (status = 200, description = "Intelligence pack or `{ text }` studio output"),
        (status = 400, description = "Missing text or unsupported option"),
        (status = 500, description = "Provider misconfigured or failed")
    )
)]
pub async fn generate_intelligence(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let request: GenerationRequest = match parse_json_body(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Unreadable generation body: {}", e);
            return error_response(
                StatusCode::BAD_REQUEST,
                "Request body must be a JSON object",
            );
        }
    };

    match state.intelligence.generate(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => generation_error_response(e),
    }
}
