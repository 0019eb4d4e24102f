use axum::{
    extract::{Query, State},
    Extension, Json,
};
use echolens_news::{
    run_company_enrichment, CompanyEnrichment, CoverageReport, EnrichedArticle, FetchStatus,
    SentimentLabel,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ArticlesQuery {
    pub company: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisData {
    pub company: String,
    pub dominant_sentiment: Option<SentimentLabel>,
    #[serde(flatten)]
    pub report: CoverageReport,
}

/// GET /api/v1/articles: fetch and enrich a company's news coverage.
pub(super) async fn list_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<ApiResponse<Vec<EnrichedArticle>>>, ApiError> {
    let enrichment = load_enrichment(&state, &req_id.0, &query).await?;

    Ok(Json(ApiResponse {
        data: enrichment.articles,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/articles/analysis: comparative summary over the same coverage.
pub(super) async fn analyze_articles(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<ApiResponse<AnalysisData>>, ApiError> {
    let enrichment = load_enrichment(&state, &req_id.0, &query).await?;
    let report = CoverageReport::from_articles(&enrichment.articles);

    Ok(Json(ApiResponse {
        data: AnalysisData {
            company: enrichment.company,
            dominant_sentiment: report.dominant_sentiment(),
            report,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn load_enrichment(
    state: &AppState,
    rid: &str,
    query: &ArticlesQuery,
) -> Result<CompanyEnrichment, ApiError> {
    let company = query.company.as_deref().map_or("", str::trim);
    if company.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "Company name is required",
        ));
    }

    let limit = normalize_limit(query.limit, state.settings.default_limit);
    let enrichment = run_company_enrichment(
        state.source.as_ref(),
        state.scorer.as_ref(),
        company,
        limit,
        state.settings.scoring_mode,
    )
    .await;

    match enrichment.status {
        FetchStatus::Found => Ok(enrichment),
        FetchStatus::Empty => Err(ApiError::new(rid, "not_found", "No articles found")),
        FetchStatus::UpstreamFailed => Err(ApiError::new(
            rid,
            "upstream_error",
            "news source is unavailable",
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use axum::http::StatusCode;

    use super::super::test_support::{app_with, get, raw, send, StubSource};

    #[tokio::test]
    async fn list_articles_rejects_blank_company() {
        let app = app_with(Arc::new(StubSource::with(vec![raw("A", "a")])));

        let (status, json) = send(app.clone(), get("/api/v1/articles")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");

        let (status, _) = send(app, get("/api/v1/articles?company=%20%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_articles_returns_enriched_articles_in_order() {
        let source = Arc::new(StubSource::with(vec![
            raw("Tesla unveils new EV", "Tesla stock hits a record high"),
            raw("Recall announced", "Regulators open an inquiry"),
        ]));
        let app = app_with(Arc::clone(&source));

        let (status, json) = send(app, get("/api/v1/articles?company=Tesla")).await;
        assert_eq!(status, StatusCode::OK);

        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["title"], "Tesla unveils new EV");
        assert_eq!(data[0]["sentiment"]["label"], "Positive");
        assert_eq!(data[1]["title"], "Recall announced");
        assert_eq!(data[1]["sentiment"]["label"], "Negative");
        assert!(data[0]["topics"]
            .as_array()
            .expect("topics")
            .iter()
            .any(|t| t == "Automotive"));
        assert_eq!(source.last_limit.load(Ordering::SeqCst), 15);
    }

    #[tokio::test]
    async fn list_articles_clamps_requested_limit() {
        let source = Arc::new(StubSource::with(vec![raw("A", "a")]));
        let app = app_with(Arc::clone(&source));

        let (status, _) = send(app, get("/api/v1/articles?company=Acme&limit=500")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.last_limit.load(Ordering::SeqCst), 100);
    }

    #[tokio::test]
    async fn list_articles_returns_404_when_no_coverage() {
        let app = app_with(Arc::new(StubSource::with(Vec::new())));

        let (status, json) = send(app, get("/api/v1/articles?company=Nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "No articles found");
    }

    #[tokio::test]
    async fn list_articles_returns_502_when_source_fails() {
        let app = app_with(Arc::new(StubSource::failing()));

        let (status, json) = send(app, get("/api/v1/articles?company=Tesla")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn analysis_summarizes_coverage() {
        let app = app_with(Arc::new(StubSource::with(vec![
            raw("Bank posts record profit", "Quarterly profit hits a record"),
            raw("Bank fined", "Regulators fine the bank over stock disclosures"),
            raw("Bank expands", "Another record quarter for lending"),
        ])));

        let (status, json) = send(app, get("/api/v1/articles/analysis?company=Bank")).await;
        assert_eq!(status, StatusCode::OK);

        let data = &json["data"];
        assert_eq!(data["company"], "Bank");
        assert_eq!(data["article_count"], 3);
        assert_eq!(data["sentiment_distribution"]["Positive"], 2);
        assert_eq!(data["sentiment_distribution"]["Negative"], 1);
        assert_eq!(data["dominant_sentiment"], "Positive");
        assert_eq!(data["topic_counts"]["Finance"], 3);
    }
}
