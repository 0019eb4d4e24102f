//! News source abstractions.

mod newsapi;

pub use newsapi::NewsApiClient;

use async_trait::async_trait;

use crate::error::NewsError;
use crate::types::RawArticle;

/// A searchable source of news articles.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch at most `limit` articles about `company_name`.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] when the upstream call fails.
    async fn fetch(&self, company_name: &str, limit: usize) -> Result<Vec<RawArticle>, NewsError>;

    /// Short identifier used in log fields.
    fn name(&self) -> &'static str;
}

/// Whether a fetch found articles, found none, or failed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Found,
    Empty,
    UpstreamFailed,
}

/// Articles collected for one company plus how the fetch went.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub articles: Vec<RawArticle>,
    pub status: FetchStatus,
}

/// Fetch articles for a company, degrading upstream failures to an empty list.
///
/// The failure is logged and recorded in [`FetchOutcome::status`] so callers
/// can tell "no coverage" apart from "source unavailable".
pub async fn collect_articles(
    source: &dyn NewsSource,
    company_name: &str,
    limit: usize,
) -> FetchOutcome {
    match source.fetch(company_name, limit).await {
        Ok(articles) if articles.is_empty() => {
            tracing::info!(
                company = company_name,
                source = source.name(),
                "no articles found"
            );
            FetchOutcome {
                articles,
                status: FetchStatus::Empty,
            }
        }
        Ok(articles) => {
            tracing::debug!(
                company = company_name,
                source = source.name(),
                count = articles.len(),
                "collected articles"
            );
            FetchOutcome {
                articles,
                status: FetchStatus::Found,
            }
        }
        Err(e) => {
            tracing::warn!(
                company = company_name,
                source = source.name(),
                error = %e,
                "news fetch failed"
            );
            FetchOutcome {
                articles: Vec::new(),
                status: FetchStatus::UpstreamFailed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Result<Vec<RawArticle>, String>);

    #[async_trait]
    impl NewsSource for FixedSource {
        async fn fetch(&self, _: &str, limit: usize) -> Result<Vec<RawArticle>, NewsError> {
            self.0
                .clone()
                .map(|articles| articles.into_iter().take(limit).collect())
                .map_err(NewsError::NewsApi)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn article(title: &str) -> RawArticle {
        RawArticle::new(Some(title.to_string()), Some("summary".to_string()))
    }

    #[tokio::test]
    async fn found_articles_are_returned() {
        let source = FixedSource(Ok(vec![article("A"), article("B")]));
        let outcome = collect_articles(&source, "Acme", 10).await;
        assert_eq!(outcome.status, FetchStatus::Found);
        assert_eq!(outcome.articles.len(), 2);
    }

    #[tokio::test]
    async fn empty_result_is_empty_status() {
        let source = FixedSource(Ok(Vec::new()));
        let outcome = collect_articles(&source, "Acme", 10).await;
        assert_eq!(outcome.status, FetchStatus::Empty);
        assert!(outcome.articles.is_empty());
    }

    #[tokio::test]
    async fn upstream_error_degrades_to_empty() {
        let source = FixedSource(Err("HTTP 500".to_string()));
        let outcome = collect_articles(&source, "Acme", 10).await;
        assert_eq!(outcome.status, FetchStatus::UpstreamFailed);
        assert!(outcome.articles.is_empty());
    }
}
