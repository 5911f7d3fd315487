use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use super::{body_or_default, error_response};
use crate::auth::Claims;
use crate::domain::{Account, NewCrmRecord};
use crate::infrastructure::AppState;

const DEFAULT_RECORD_TYPE: &str = "general";

#[derive(Debug, Default, Deserialize)]
pub struct SaveRecordRequest {
    raw: Option<String>,
    processed: Option<String>,
    r#type: Option<String>,
}

/// Resolve the token subject to a stored account, or the response to send back
async fn resolve_caller(state: &AppState, claims: &Claims) -> Result<Account, Response> {
    match state.user_repo.find_by_email(&claims.sub).await {
        Ok(Some(user)) => Ok(user.account),
        Ok(None) => {
            tracing::warn!("Token subject {} has no account", claims.sub);
            Err(error_response(
                StatusCode::NOT_FOUND,
                "User not found in database.",
            ))
        }
        Err(e) => {
            tracing::error!("Failed to resolve caller {}: {}", claims.sub, e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save record.",
            ))
        }
    }
}

// Save a generated output for the logged-in user
#[utoipa::path(
    post,
    path = "/api/crm/save",
    responses(
        (status = 200, description = "Record created"),
        (status = 400, description = "Missing processed output"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Caller has no account")
    )
)]
pub async fn save_record(
    State(state): State<AppState>,
    claims: Claims,
    body: Bytes,
) -> Response {
    let body: SaveRecordRequest = body_or_default(&body);

    let Some(processed) = body.processed.filter(|p| !p.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing data to save.");
    };

    let user = match resolve_caller(&state, &claims).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let record = NewCrmRecord {
        user_id: user.id,
        raw: body.raw.unwrap_or_default(),
        processed,
        record_type: body
            .r#type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RECORD_TYPE.to_string()),
    };

    match state.crm_repo.create(record).await {
        Ok(saved) => {
            tracing::info!("Saved CRM record {} for user {}", saved.id, user.id);
            Json(json!({ "success": true, "record": saved })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to save CRM record: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not save record.")
        }
    }
}

// List the caller's saved records, newest first
#[utoipa::path(
    get,
    path = "/api/crm/records",
    responses(
        (status = 200, description = "Caller's records, newest first"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Caller has no account")
    )
)]
pub async fn list_records(State(state): State<AppState>, claims: Claims) -> Response {
    let user = match resolve_caller(&state, &claims).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    match state.crm_repo.find_by_user(user.id).await {
        Ok(records) => Json(json!({
            "total": records.len(),
            "records": records,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to list CRM records: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not load records.")
        }
    }
}
