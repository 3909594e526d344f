use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use parley_api::build_app;
use parley_engine::EngineConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "dev-parley-key";

fn app() -> Router {
    build_app(&EngineConfig::default()).expect("app should build")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-content-type-options")
            .and_then(|value| value.to_str().ok()),
        Some("nosniff")
    );

    let parsed = read_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["max_input_chars"], 1000);
    assert!(parsed["lexicon"]["entries"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn suggest_requires_api_key() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/suggest")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "are you hungry" }).to_string()))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(response).await["error"], "unauthorized");
}

#[tokio::test]
async fn suggest_returns_outcome() {
    let response = app()
        .oneshot(post_json(
            "/v1/suggest",
            json!({ "text": "Do you want apple or banana" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["intent"], "choice");
    assert_eq!(parsed["choices"], json!(["apple", "banana"]));
    assert_eq!(parsed["truncated"], false);

    let suggestions = parsed["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0]["text"], "I want apple");
    assert_eq!(suggestions[0]["symbol"], "🍎");
    assert_eq!(suggestions[2]["text"], "Both apple and banana");
}

#[tokio::test]
async fn classify_reports_intent_and_choices() {
    let response = app()
        .oneshot(post_json(
            "/v1/classify",
            json!({ "text": "juice, water, or milk" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["intent"], "choice");
    assert_eq!(parsed["choices"], json!(["juice", "water", "milk"]));
}

#[tokio::test]
async fn compose_uses_named_intent() {
    let response = app()
        .oneshot(post_json(
            "/v1/compose",
            json!({ "intent": "when", "choices": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["intent"], "when");
    let texts = parsed["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["text"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["Right now", "Later", "Tomorrow"]);
}

#[tokio::test]
async fn compose_rejects_unknown_intent() {
    let response = app()
        .oneshot(post_json(
            "/v1/compose",
            json!({ "intent": "gossip", "choices": [] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "unknown_intent");
}

#[tokio::test]
async fn oversize_utterance_is_rejected() {
    let text = "a".repeat(1_200);
    let response = app()
        .oneshot(post_json("/v1/suggest", json!({ "text": text })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(read_json(response).await["error"], "utterance_too_long");
}

#[tokio::test]
async fn symbols_resolve_through_categories() {
    let request = Request::builder()
        .uri("/v1/symbols/resolve?token=Lasagna")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = read_json(response).await;
    assert_eq!(parsed["token"], "lasagna");
    assert_eq!(parsed["symbol"], "🍽️");
}

#[tokio::test]
async fn lexicon_packs_extend_the_api() {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../lexicon");
    let config = EngineConfig::default().with_lexicon_dir(root.join("symbols"));
    let app = build_app(&config).expect("app should build");

    let request = Request::builder()
        .uri("/v1/symbols/resolve?token=puzzle")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(read_json(response).await["symbol"], "🧩");
}
