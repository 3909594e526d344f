mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use parley_core::{ChoiceSet, Intent, SuggestionList};
use parley_engine::{EngineConfig, LexiconStats, SuggestionEngine};
use parley_observability::{EngineMetrics, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::rate_limit::{RateDecision, SlidingWindowLimiter};

const MAX_BODY_BYTES: usize = 16 * 1024;
const MAX_COMPOSE_CHOICES: usize = 16;
const MAX_TOKEN_LEN: usize = 64;

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<SuggestionEngine>,
    pub api_key: String,
    pub limiter: SlidingWindowLimiter,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    timestamp_utc: String,
    max_input_chars: usize,
    lexicon: &'a LexiconStats,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ComposeRequest {
    intent: String,
    #[serde(default)]
    choices: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ClassifyResponse {
    intent: Intent,
    choices: ChoiceSet,
}

#[derive(Debug, Serialize)]
struct ComposeResponse {
    intent: Intent,
    suggestions: SuggestionList,
}

#[derive(Debug, Deserialize)]
struct SymbolQuery {
    token: String,
}

#[derive(Debug, Serialize)]
struct SymbolResponse {
    token: String,
    symbol: String,
}

pub fn build_app(config: &EngineConfig) -> Result<Router> {
    let metrics = EngineMetrics::shared();
    let engine = Arc::new(SuggestionEngine::from_config(config, metrics)?);

    let api_key = env::var("PARLEY_API_KEY").unwrap_or_else(|_| "dev-parley-key".to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("PARLEY_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("PARLEY_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(240);

    let state = ApiState {
        engine,
        api_key,
        limiter: SlidingWindowLimiter::new(rate_limit_window, rate_limit_max),
        allowed_origins: Arc::new(parse_allowed_origins()),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/suggest", post(suggest))
        .route("/v1/classify", post(classify))
        .route("/v1/compose", post(compose))
        .route("/v1/symbols/resolve", get(resolve_symbol))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> Response {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        max_input_chars: state.engine.input_policy().max_graphemes(),
        lexicon: state.engine.lexicon_stats(),
        metrics: state.engine.metrics().snapshot(),
    };
    (StatusCode::OK, Json(payload)).into_response()
}

async fn suggest(State(state): State<ApiState>, Json(request): Json<TextRequest>) -> Response {
    if let Some(rejection) = reject_oversize(&state, &request.text) {
        return rejection;
    }

    let outcome = state.engine.suggest(&request.text);
    (StatusCode::OK, Json(outcome)).into_response()
}

async fn classify(State(state): State<ApiState>, Json(request): Json<TextRequest>) -> Response {
    if let Some(rejection) = reject_oversize(&state, &request.text) {
        return rejection;
    }

    let intent = state.engine.classify(&request.text);
    let choices = match intent {
        Intent::Choice => state.engine.extract_choices(&request.text),
        _ => ChoiceSet::new(),
    };
    (StatusCode::OK, Json(ClassifyResponse { intent, choices })).into_response()
}

async fn compose(State(state): State<ApiState>, Json(request): Json<ComposeRequest>) -> Response {
    let Some(intent) = Intent::parse(&request.intent) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "unknown_intent",
            &format!("`{}` is not a known intent", request.intent),
        );
    };
    if request.choices.len() > MAX_COMPOSE_CHOICES {
        return error_response(
            StatusCode::BAD_REQUEST,
            "too_many_choices",
            &format!("at most {MAX_COMPOSE_CHOICES} choices are accepted"),
        );
    }

    let choices = request.choices.iter().collect::<ChoiceSet>();
    let suggestions = state.engine.compose(intent, &choices);
    (StatusCode::OK, Json(ComposeResponse { intent, suggestions })).into_response()
}

async fn resolve_symbol(
    State(state): State<ApiState>,
    Query(query): Query<SymbolQuery>,
) -> Response {
    let token = query.token.trim().to_lowercase();
    if token.chars().count() > MAX_TOKEN_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            "token_too_long",
            &format!("token must be at most {MAX_TOKEN_LEN} characters"),
        );
    }

    let symbol = state.engine.resolve_symbol(&token).to_string();
    (StatusCode::OK, Json(SymbolResponse { token, symbol })).into_response()
}

fn reject_oversize(state: &ApiState, text: &str) -> Option<Response> {
    let policy = state.engine.input_policy();
    if !policy.exceeds(text) {
        return None;
    }
    Some(error_response(
        StatusCode::PAYLOAD_TOO_LARGE,
        "utterance_too_long",
        &format!(
            "utterance must be at most {} characters",
            policy.max_graphemes()
        ),
    ))
}

fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": error,
            "message": message
        })),
    )
        .into_response()
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !constant_time_eq(header_key.as_bytes(), state.api_key.as_bytes()) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid x-api-key",
        );
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let ip = request_ip(&request);
    if let RateDecision::Limited { retry_after } = state.limiter.check(&ip) {
        warn!(ip = %ip, "rate limit exceeded");
        let mut response = error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded for this IP",
        );
        let seconds = retry_after.as_secs().max(1).to_string();
        if let Ok(value) = HeaderValue::from_str(&seconds) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    next.run(request).await
}

async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response.headers_mut().insert(
        header::HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    );
    response.headers_mut().insert(
        header::HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("no-referrer"),
    );
    response.headers_mut().insert(
        header::HeaderName::from_static("content-security-policy"),
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'; base-uri 'none'"),
    );

    response
}

fn is_public_endpoint(path: &str) -> bool {
    matches!(path, "/health")
}

fn request_ip(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .next()
                .unwrap_or("unknown")
                .trim()
                .to_string()
        })
        .unwrap_or_else(|| "local".to_string())
}

fn parse_allowed_origins() -> Vec<String> {
    let default_origins = [
        "http://localhost:5500",
        "http://127.0.0.1:5500",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ];

    env::var("PARLEY_ALLOWED_ORIGINS")
        .ok()
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|| {
            default_origins
                .iter()
                .map(|value| value.trim_end_matches('/').to_string())
                .collect()
        })
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static("http://localhost:5500")]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-api-key"),
        ])
}

fn constant_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut diff = 0_u8;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        diff |= a ^ b;
    }
    diff == 0
}
