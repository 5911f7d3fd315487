use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use super::{body_or_default, error_response};
use crate::auth::{Claims, create_jwt, generate_reset_token, hash_password, verify_password};
use crate::domain::{DomainError, NewAccount, ResetToken};
use crate::infrastructure::AppState;

const MIN_PASSWORD_LEN: usize = 8;
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Trimmed, lowercased email; `None` when blank
pub fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Missing fields or weak password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let payload: SignupRequest = body_or_default(&body);

    let (Some(email), Some(password)) =
        (normalize_email(payload.email), non_empty(payload.password))
    else {
        return error_response(StatusCode::BAD_REQUEST, "Email and password are required.");
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters.",
        );
    }

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Signup error: password hashing failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error during signup.",
            );
        }
    };

    let account = NewAccount {
        name: payload.name.unwrap_or_default().trim().to_string(),
        email,
        password_hash,
    };

    match state.user_repo.create(account).await {
        Ok(account) => {
            tracing::info!("Created account {} ({})", account.id, account.email);
            (
                StatusCode::CREATED,
                Json(json!({ "success": true, "userId": account.id })),
            )
                .into_response()
        }
        Err(DomainError::Conflict(_)) => error_response(
            StatusCode::CONFLICT,
            "An account with this email already exists.",
        ),
        Err(e) => {
            tracing::error!("Signup error: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error during signup.",
            )
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Bearer token issued"),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let payload: LoginRequest = body_or_default(&body);

    let (Some(email), Some(password)) =
        (normalize_email(payload.email), non_empty(payload.password))
    else {
        return error_response(StatusCode::BAD_REQUEST, "Missing email or password");
    };

    tracing::info!("Login attempt for user: {}", email);

    let user = match state.user_repo.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            tracing::warn!("User not found: {}", email);
            return error_response(StatusCode::UNAUTHORIZED, "Invalid login");
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not log in.");
        }
    };

    match verify_password(&password, &user.password_hash) {
        Ok(true) => match create_jwt(&user.account.email, user.account.id) {
            Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
            Err(e) => {
                tracing::error!("Failed to issue token: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not log in.")
            }
        },
        _ => {
            tracing::warn!("Password verification failed for user: {}", email);
            error_response(StatusCode::UNAUTHORIZED, "Invalid login")
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn me(State(state): State<AppState>, claims: Claims) -> Response {
    match state.user_repo.find_by_email(&claims.sub).await {
        Ok(Some(user)) => (StatusCode::OK, Json(json!({ "user": user.account }))).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found in database."),
        Err(e) => {
            tracing::error!("Failed to load current user: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not load account.")
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RequestResetRequest {
    email: Option<String>,
}

/// Always answers `{ success: true }` for a well-formed request so callers
/// cannot probe which emails are registered.
#[utoipa::path(
    post,
    path = "/api/auth/request-reset",
    responses(
        (status = 200, description = "Reset started (or silently ignored)"),
        (status = 400, description = "Missing email")
    )
)]
pub async fn request_reset(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let Some(email) = normalize_email(body_or_default::<RequestResetRequest>(&body).email) else {
        return error_response(StatusCode::BAD_REQUEST, "Email is required.");
    };

    let failed = |e: DomainError| {
        tracing::error!("Request reset error: {}", e);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not start password reset.",
        )
    };

    match state.user_repo.find_by_email(&email).await {
        Ok(Some(_)) => {}
        Ok(None) => return Json(json!({ "success": true })).into_response(),
        Err(e) => return failed(e),
    }

    let token = ResetToken {
        identifier: email,
        token: generate_reset_token(),
        expires: Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
    };
    let reset_url = format!(
        "{}/reset-password?token={}",
        state.config.app_url, token.token
    );

    if let Err(e) = state.reset_token_repo.create(token).await {
        return failed(e);
    }

    // No mailer yet: the link only goes to the server log.
    tracing::info!("Password reset URL: {}", reset_url);

    Json(json!({ "success": true })).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordRequest {
    token: Option<String>,
    password: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    responses(
        (status = 200, description = "Password replaced"),
        (status = 400, description = "Missing fields, weak password, or invalid/expired token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let payload: ResetPasswordRequest = body_or_default(&body);

    let (Some(token), Some(password)) = (non_empty(payload.token), non_empty(payload.password))
    else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Token and new password are required.",
        );
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters.",
        );
    }

    let failed = |e: DomainError| {
        tracing::error!("Reset password error: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not reset password.")
    };
    let invalid =
        || error_response(StatusCode::BAD_REQUEST, "Reset link is invalid or has expired.");

    let record = match state.reset_token_repo.find(&token).await {
        Ok(Some(record)) => record,
        Ok(None) => return invalid(),
        Err(e) => return failed(e),
    };

    if record.is_expired(Utc::now()) {
        if let Err(e) = state.reset_token_repo.delete(&token).await {
            tracing::warn!("Failed to drop expired reset token: {}", e);
        }
        return invalid();
    }

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => return failed(DomainError::Internal(e)),
    };

    match state
        .user_repo
        .update_password(&record.identifier, password_hash)
        .await
    {
        Ok(()) => {}
        Err(DomainError::NotFound) => {
            tracing::warn!("Reset token for missing account {}", record.identifier);
            if let Err(e) = state.reset_token_repo.delete(&token).await {
                tracing::warn!("Failed to drop orphaned reset token: {}", e);
            }
            return invalid();
        }
        Err(e) => return failed(e),
    }

    if let Err(e) = state.reset_token_repo.delete(&token).await {
        return failed(e);
    }

    tracing::info!("Password reset completed for {}", record.identifier);
    Json(json!({ "success": true })).into_response()
}
