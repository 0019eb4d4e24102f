//! `NewsAPI` `everything` search client.

use std::time::Duration;

use async_trait::async_trait;
use echolens_core::AppConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::error::NewsError;
use crate::types::RawArticle;

use super::NewsSource;

const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// `NewsAPI` caps `pageSize` at 100.
const MAX_PAGE_SIZE: usize = 100;

/// Success and error bodies share one shape. Errors carry
/// `"status": "error"` with a `code` and `message`, sometimes under HTTP 200.
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

impl NewsApiResponse {
    fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    fn error_detail(self) -> String {
        format!(
            "{}: {}",
            self.code.unwrap_or_else(|| "unknown".to_string()),
            self.message.unwrap_or_default()
        )
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
}

/// Client for the `NewsAPI` `v2/everything` endpoint.
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl NewsApiClient {
    /// Creates a client pointed at the production `NewsAPI` host.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, NewsError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`NewsError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NewsError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Creates a client from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::MissingApiKey`] when `NEWSAPI_API_KEY` is not
    /// configured. Otherwise see [`NewsApiClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NewsError> {
        let api_key = config
            .newsapi_api_key
            .as_deref()
            .ok_or(NewsError::MissingApiKey("NEWSAPI_API_KEY"))?;
        Self::with_base_url(
            api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.newsapi_base_url,
        )
    }

    /// Builds the search URL with percent-encoded query parameters.
    fn build_url(&self, company_name: &str, limit: usize) -> Result<Url, NewsError> {
        let mut url = self
            .base_url
            .join("v2/everything")
            .map_err(|e| NewsError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", company_name)
            .append_pair("pageSize", &limit.clamp(1, MAX_PAGE_SIZE).to_string())
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    /// Searches for articles mentioning `company_name`.
    ///
    /// Missing or empty titles and descriptions are replaced with placeholders.
    /// At most `limit` articles are returned.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] on network failure or
    /// [`NewsError::NewsApi`] when `NewsAPI` answers with a non-success
    /// status or an `"status": "error"` body.
    async fn fetch(&self, company_name: &str, limit: usize) -> Result<Vec<RawArticle>, NewsError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = self.build_url(company_name, limit)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<NewsApiResponse>()
                .await
                .map(NewsApiResponse::error_detail)
                .unwrap_or_default();
            return Err(NewsError::NewsApi(format!("HTTP {status} {detail}")));
        }

        let body: NewsApiResponse = response.json().await?;
        if body.is_error() {
            return Err(NewsError::NewsApi(body.error_detail()));
        }

        let articles = body
            .articles
            .into_iter()
            .take(limit)
            .map(|article| RawArticle::new(article.title, article.description))
            .collect();

        Ok(articles)
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}
