use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`
use veris::api;
use veris::auth::decode_jwt;
use veris::config::Config;
use veris::db;
use veris::infrastructure::AppState;
use veris::intelligence::{ChatCompletion, CompletionProvider, GenerationError};
use veris::models::{user, verification_token};

struct UnusedProvider;

#[async_trait]
impl CompletionProvider for UnusedProvider {
    async fn complete(&self, _request: ChatCompletion) -> Result<String, GenerationError> {
        Err(GenerationError::Upstream("not expected in auth tests".into()))
    }
}

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::with_provider(db, Config::default(), Arc::new(UnusedProvider))
}

fn app(state: &AppState) -> Router {
    api::api_router(state.clone())
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn signup(state: &AppState, email: &str, password: &str) -> Response {
    app(state)
        .oneshot(post_json(
            "/auth/signup",
            &json!({ "name": "Dana", "email": email, "password": password }),
        ))
        .await
        .unwrap()
}

async fn login(state: &AppState, email: &str, password: &str) -> Response {
    app(state)
        .oneshot(post_json(
            "/auth/login",
            &json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_signup_and_login_flow() {
    let state = setup_test_state().await;

    let response = signup(&state, "Dana@Example.com ", "hunter2hunter2").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let user_id = json["userId"].as_i64().unwrap();

    let stored = user::Entity::find().one(state.db()).await.unwrap().unwrap();
    assert_eq!(stored.email, "dana@example.com");
    assert_ne!(stored.password_hash, "hunter2hunter2");

    let response = login(&state, "dana@example.com", "hunter2hunter2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let claims = decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "dana@example.com");
    assert_eq!(i64::from(claims.uid), user_id);

    let req = Request::builder()
        .uri("/auth/me")
        .method("GET")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["email"], "dana@example.com");
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_signup_validation() {
    let state = setup_test_state().await;

    let response = app(&state)
        .oneshot(post_json("/auth/signup", &json!({ "email": "a@b.c" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = signup(&state, "a@b.c", "short").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Password must be at least 8 characters."
    );

    let response = signup(&state, "a@b.c", "long enough").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = signup(&state, "A@B.C", "another long one").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let count = user::Entity::find().count(state.db()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_simultaneous_signups_for_one_email_conflict() {
    let state = setup_test_state().await;

    let (first, second) = tokio::join!(
        signup(&state, "twin@example.com", "password one"),
        signup(&state, "twin@example.com", "password two"),
    );
    let mut statuses = [first.status(), second.status()];
    statuses.sort();

    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
    let count = user::Entity::find().count(state.db()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_signup_accepts_json_sent_as_text_plain() {
    let state = setup_test_state().await;

    let req = Request::builder()
        .uri("/auth/signup")
        .method("POST")
        .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
        .body(Body::from(
            json!({ "email": "plain@example.com", "password": "long enough" }).to_string(),
        ))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(&state, "plain@example.com", "long enough").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let state = setup_test_state().await;
    signup(&state, "agent@example.com", "right password").await;

    let wrong_password = login(&state, "agent@example.com", "wrong password").await;
    let unknown_user = login(&state, "nobody@example.com", "right password").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_user).await
    );

    let missing = app(&state)
        .oneshot(post_json("/auth/login", &json!({ "email": "agent@example.com" })))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_requires_token() {
    let state = setup_test_state().await;

    let req = Request::builder()
        .uri("/auth/me")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/auth/me")
        .method("GET")
        .header(header::AUTHORIZATION, "Basic abc")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_reset_does_not_reveal_accounts() {
    let state = setup_test_state().await;
    signup(&state, "agent@example.com", "right password").await;

    let response = app(&state)
        .oneshot(post_json(
            "/auth/request-reset",
            &json!({ "email": "nobody@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    assert_eq!(
        verification_token::Entity::find()
            .count(state.db())
            .await
            .unwrap(),
        0
    );

    let response = app(&state)
        .oneshot(post_json("/auth/request-reset", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_reset_round_trip() {
    let state = setup_test_state().await;
    signup(&state, "agent@example.com", "old password").await;

    let response = app(&state)
        .oneshot(post_json(
            "/auth/request-reset",
            &json!({ "email": "agent@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let token = verification_token::Entity::find()
        .one(state.db())
        .await
        .unwrap()
        .expect("reset token stored");
    assert_eq!(token.identifier, "agent@example.com");
    assert_eq!(token.token.len(), 64);

    let response = app(&state)
        .oneshot(post_json(
            "/auth/reset-password",
            &json!({ "token": &token.token, "password": "new password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        login(&state, "agent@example.com", "old password").await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login(&state, "agent@example.com", "new password").await.status(),
        StatusCode::OK
    );

    // Tokens are single use
    let response = app(&state)
        .oneshot(post_json(
            "/auth/reset-password",
            &json!({ "token": &token.token, "password": "third password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_expired_reset_token_is_rejected_and_removed() {
    let state = setup_test_state().await;
    signup(&state, "agent@example.com", "old password").await;

    verification_token::ActiveModel {
        identifier: Set("agent@example.com".to_string()),
        token: Set("ab".repeat(32)),
        expires: Set((Utc::now() - Duration::minutes(5)).to_rfc3339()),
        ..Default::default()
    }
    .insert(state.db())
    .await
    .expect("insert token");

    let response = app(&state)
        .oneshot(post_json(
            "/auth/reset-password",
            &json!({ "token": "ab".repeat(32), "password": "new password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Reset link is invalid or has expired."
    );
    assert_eq!(
        verification_token::Entity::find()
            .count(state.db())
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        login(&state, "agent@example.com", "old password").await.status(),
        StatusCode::OK
    );
}
