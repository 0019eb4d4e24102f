mod articles;
mod speech;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use echolens_core::{AppConfig, ScoringMode};
use echolens_news::{NewsSource, SentimentScorer, SpeechClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    request_id, require_speech_token, throttle_company_lookups, LookupThrottle, RequestId,
    SpeechAccess,
};

/// Upper bound on articles fetched per request.
const MAX_ARTICLE_LIMIT: usize = 100;

/// Shared collaborators for every handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn NewsSource>,
    pub scorer: Arc<dyn SentimentScorer>,
    pub speech: Arc<SpeechClient>,
    pub settings: ApiSettings,
}

/// Request defaults taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub default_limit: usize,
    pub scoring_mode: ScoringMode,
    pub speech_lang: String,
}

impl ApiSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_limit: config.article_limit,
            scoring_mode: config.scoring_mode,
            speech_lang: config.speech_lang.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Resolve the requested article count: the configured default when absent,
/// otherwise clamped to `1..=MAX_ARTICLE_LIMIT`.
pub(super) fn normalize_limit(limit: Option<i64>, default: usize) -> usize {
    match limit {
        Some(requested) => usize::try_from(requested)
            .unwrap_or(0)
            .clamp(1, MAX_ARTICLE_LIMIT),
        None => default.clamp(1, MAX_ARTICLE_LIMIT),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn article_routes(lookups: LookupThrottle) -> Router<AppState> {
    Router::new()
        .route("/api/v1/articles", get(articles::list_articles))
        .route(
            "/api/v1/articles/analysis",
            get(articles::analyze_articles),
        )
        .layer(axum::middleware::from_fn_with_state(
            lookups,
            throttle_company_lookups,
        ))
}

fn speech_routes(access: SpeechAccess) -> Router<AppState> {
    Router::new()
        .route("/api/v1/speech", post(speech::convert_to_speech))
        .layer(axum::middleware::from_fn_with_state(
            access,
            require_speech_token,
        ))
}

pub fn build_app(state: AppState, speech_access: SpeechAccess, lookups: LookupThrottle) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(article_routes(lookups))
        .merge(speech_routes(speech_access))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::{app_with, get, send, StubSource};
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None, 15), 15);
        assert_eq!(normalize_limit(None, 0), 1);
        assert_eq!(normalize_limit(Some(0), 15), 1);
        assert_eq!(normalize_limit(Some(-3), 15), 1);
        assert_eq!(normalize_limit(Some(1_000), 15), MAX_ARTICLE_LIMIT);
        assert_eq!(normalize_limit(Some(25), 15), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_upstream_error_maps_to_bad_gateway() {
        let response = ApiError::new("req-1", "upstream_error", "source down").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_returns_ok_with_request_id() {
        let app = app_with(Arc::new(StubSource::with(Vec::new())));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-health")
        );
    }

    fn post_speech(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/speech")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::from(r#"{"text":"  "}"#)).expect("request")
    }

    fn app_with_guards(access: SpeechAccess, lookups: LookupThrottle) -> Router {
        let state = test_support::state_with(
            Arc::new(StubSource::with(Vec::new())),
            "http://127.0.0.1:9",
            std::env::temp_dir(),
        );
        build_app(state, access, lookups)
    }

    #[tokio::test]
    async fn speech_route_requires_configured_token() {
        let tokens = ["secret".to_string()];
        let access = SpeechAccess::from_tokens(&tokens, &echolens_core::Environment::Production);
        let app = app_with_guards(access, test_support::roomy_throttle());

        let (status, json) = send(app.clone(), post_speech(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");

        let (status, _) = send(app.clone(), post_speech(Some("wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // A valid token reaches the handler, which rejects the blank text.
        let (status, json) = send(app.clone(), post_speech(Some("secret"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");

        // Article lookups stay open without a token.
        let (status, _) = send(app, get("/api/v1/articles?company=Tesla")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn speech_route_is_forbidden_without_tokens_outside_development() {
        let access = SpeechAccess::from_tokens(&[], &echolens_core::Environment::Production);
        let app = app_with_guards(access, test_support::roomy_throttle());

        let (status, json) = send(app, post_speech(Some("anything"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "forbidden");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn repeated_lookups_for_one_company_are_throttled() {
        let app = app_with_guards(SpeechAccess::Open, LookupThrottle::per_minute(1));

        let (first, _) = send(app.clone(), get("/api/v1/articles?company=Tesla")).await;
        assert_eq!(first, StatusCode::NOT_FOUND);

        let response = app
            .clone()
            .oneshot(get("/api/v1/articles/analysis?company=%20tesla%20"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));

        // Another company has its own budget.
        let (other, _) = send(app.clone(), get("/api/v1/articles?company=Acme")).await;
        assert_eq!(other, StatusCode::NOT_FOUND);

        // Missing company is left to the handler's validation.
        let (missing, json) = send(app, get("/api/v1/articles")).await;
        assert_eq!(missing, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }
}
