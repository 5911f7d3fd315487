use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::util::ServiceExt; // for `oneshot`
use veris::api;
use veris::auth;
use veris::config::Config;
use veris::db;
use veris::domain::NewAccount;
use veris::infrastructure::AppState;
use veris::intelligence::{ChatCompletion, CompletionProvider, GenerationError};
use veris::models::crm_record;

struct UnusedProvider;

#[async_trait]
impl CompletionProvider for UnusedProvider {
    async fn complete(&self, _request: ChatCompletion) -> Result<String, GenerationError> {
        Err(GenerationError::Upstream("not expected in CRM tests".into()))
    }
}

// Helper to create a test app state
async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::with_provider(db, Config::default(), Arc::new(UnusedProvider))
}

// Helper to create an account and a bearer token for it
async fn create_agent(state: &AppState, email: &str) -> (i32, String) {
    let account = state
        .user_repo
        .create(NewAccount {
            name: "Test Agent".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .expect("Failed to create user");
    let token = auth::create_jwt(&account.email, account.id).expect("Failed to create token");
    (account.id, token)
}

async fn record_count(state: &AppState) -> u64 {
    crm_record::Entity::find()
        .count(state.db())
        .await
        .expect("count records")
}

fn save_request(token: Option<&str>, payload: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri("/crm/save")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn app(state: &AppState) -> Router {
    api::api_router(state.clone())
}

#[tokio::test]
async fn test_save_without_authentication_is_rejected() {
    let state = setup_test_state().await;
    let payload = json!({ "raw": "notes", "processed": "copy", "type": "listing" });

    let response = app(&state)
        .oneshot(save_request(None, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app(&state)
        .oneshot(save_request(Some("not-a-jwt"), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(record_count(&state).await, 0);
}

#[tokio::test]
async fn test_save_with_empty_processed_is_rejected() {
    let state = setup_test_state().await;
    let (_, token) = create_agent(&state, "agent@example.com").await;

    for payload in [
        json!({ "raw": "notes", "type": "buyer" }),
        json!({ "raw": "notes", "processed": "" }),
        json!({ "raw": "notes", "processed": "   " }),
    ] {
        let response = app(&state)
            .oneshot(save_request(Some(&token), &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body_json(response).await["error"], "Missing data to save.");
    }

    assert_eq!(record_count(&state).await, 0);
}

#[tokio::test]
async fn test_save_for_unknown_identity_is_rejected() {
    let state = setup_test_state().await;
    let token = auth::create_jwt("ghost@example.com", 999).unwrap();

    let response = app(&state)
        .oneshot(save_request(
            Some(&token),
            &json!({ "raw": "r", "processed": "p" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(record_count(&state).await, 0);
}

#[tokio::test]
async fn test_save_creates_exactly_one_record_for_caller() {
    let state = setup_test_state().await;
    let (user_id, token) = create_agent(&state, "agent@example.com").await;

    let response = app(&state)
        .oneshot(save_request(
            Some(&token),
            &json!({
                "raw": "3 bed, 2 bath, big yard",
                "processed": "Charming family home with a generous yard.",
                "type": "seller"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["record"]["userId"], user_id);
    assert_eq!(json["record"]["raw"], "3 bed, 2 bath, big yard");
    assert_eq!(
        json["record"]["processed"],
        "Charming family home with a generous yard."
    );
    assert_eq!(json["record"]["type"], "seller");

    let stored = crm_record::Entity::find().all(state.db()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, user_id);
    assert_eq!(stored[0].raw, "3 bed, 2 bath, big yard");
    assert_eq!(stored[0].processed, "Charming family home with a generous yard.");
}

#[tokio::test]
async fn test_save_applies_defaults_for_raw_and_type() {
    let state = setup_test_state().await;
    let (_, token) = create_agent(&state, "agent@example.com").await;

    let response = app(&state)
        .oneshot(save_request(Some(&token), &json!({ "processed": "copy" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["record"]["raw"], "");
    assert_eq!(json["record"]["type"], "general");
}

#[tokio::test]
async fn test_list_records_only_returns_callers_records() {
    let state = setup_test_state().await;
    let (_, alice) = create_agent(&state, "alice@example.com").await;
    let (_, bob) = create_agent(&state, "bob@example.com").await;

    for (token, processed) in [(&alice, "first"), (&alice, "second"), (&bob, "bob's")] {
        let response = app(&state)
            .oneshot(save_request(Some(token.as_str()), &json!({ "processed": processed })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let req = Request::builder()
        .uri("/crm/records")
        .method("GET")
        .header(header::AUTHORIZATION, format!("Bearer {}", alice))
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["records"][0]["processed"], "second");
    assert_eq!(json["records"][1]["processed"], "first");
}
