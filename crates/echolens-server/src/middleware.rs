use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use echolens_core::{AppConfig, Environment};
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default()
}

/// Who may call the speech route. Synthesis writes audio files to the
/// server's disk, so it is the one route that is not open by default.
#[derive(Debug, Clone)]
pub enum SpeechAccess {
    /// Anyone may synthesize. Used in development when no tokens are set.
    Open,
    /// Callers must present one of these bearer tokens.
    Tokens(Arc<HashSet<String>>),
    /// No tokens configured outside development; the route answers 403.
    Disabled,
}

impl SpeechAccess {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::from_tokens(&config.speech_tokens, &config.env)
    }

    #[must_use]
    pub fn from_tokens(tokens: &[String], env: &Environment) -> Self {
        if !tokens.is_empty() {
            return Self::Tokens(Arc::new(tokens.iter().cloned().collect()));
        }

        if *env == Environment::Development {
            tracing::warn!("ECHOLENS_SPEECH_TOKENS not set; speech route open in development");
            Self::Open
        } else {
            tracing::warn!(%env, "ECHOLENS_SPEECH_TOKENS not set; speech route disabled");
            Self::Disabled
        }
    }
}

/// Guards `POST /api/v1/speech` according to [`SpeechAccess`].
pub async fn require_speech_token(
    State(access): State<SpeechAccess>,
    req: Request,
    next: Next,
) -> Response {
    let rid = request_id_of(&req);

    match access {
        SpeechAccess::Open => next.run(req).await,
        SpeechAccess::Disabled => ApiError::new(
            rid,
            "forbidden",
            "Speech synthesis is disabled on this server",
        )
        .into_response(),
        SpeechAccess::Tokens(tokens) => {
            match bearer_token(req.headers().get(header::AUTHORIZATION)) {
                Some(token) if tokens.contains(token) => next.run(req).await,
                _ => ApiError::new(rid, "unauthorized", "Missing or invalid speech token")
                    .into_response(),
            }
        }
    }
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy)]
struct LookupWindow {
    started_at: Instant,
    count: usize,
}

/// Per-company lookup quota for the article routes.
///
/// Every lookup spends news source quota plus one model call per article,
/// so repeated requests for the same company are capped per window. Names
/// are compared trimmed and case-insensitively. Distinct companies never
/// share a budget.
#[derive(Debug, Clone)]
pub struct LookupThrottle {
    max_lookups: usize,
    window: Duration,
    windows: Arc<Mutex<HashMap<String, LookupWindow>>>,
}

impl LookupThrottle {
    #[must_use]
    pub fn new(max_lookups: usize, window: Duration) -> Self {
        Self {
            max_lookups,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn per_minute(max_lookups: usize) -> Self {
        Self::new(max_lookups, Duration::from_mins(1))
    }

    /// Count one lookup for `company`. Returns the time left in the current
    /// window when the company's budget is spent.
    async fn admit(&self, company: &str) -> Result<(), Duration> {
        let key = company.trim().to_lowercase();
        let mut windows = self.windows.lock().await;

        windows.retain(|_, w| w.started_at.elapsed() < self.window);

        let entry = windows.entry(key).or_insert(LookupWindow {
            started_at: Instant::now(),
            count: 0,
        });

        if entry.count >= self.max_lookups {
            return Err(self.window.saturating_sub(entry.started_at.elapsed()));
        }

        entry.count += 1;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CompanyParam {
    company: Option<String>,
}

/// Applies [`LookupThrottle`] to requests carrying a `company` query
/// parameter. Requests without one pass through so the handler can reject
/// them with a validation error.
pub async fn throttle_company_lookups(
    State(throttle): State<LookupThrottle>,
    req: Request,
    next: Next,
) -> Response {
    let company = Query::<CompanyParam>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(param)| param.company)
        .filter(|c| !c.trim().is_empty());

    let Some(company) = company else {
        return next.run(req).await;
    };

    if let Err(retry_after) = throttle.admit(&company).await {
        let retry_secs = retry_after.as_secs().max(1);
        tracing::warn!(company = company.trim(), retry_secs, "company lookup throttled");

        let mut response = ApiError::new(
            request_id_of(&req),
            "rate_limited",
            format!(
                "Too many lookups for '{}'; retry in {retry_secs}s",
                company.trim()
            ),
        )
        .into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
        return response;
    }

    next.run(req).await
}
