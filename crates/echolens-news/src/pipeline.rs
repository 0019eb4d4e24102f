//! Article enrichment orchestration.

use echolens_core::ScoringMode;

use crate::scorer::SentimentScorer;
use crate::sources::{collect_articles, FetchStatus, NewsSource};
use crate::topics::classify;
use crate::types::{EnrichedArticle, RawArticle, SentimentVerdict};

/// Enriched coverage for one company lookup.
#[derive(Debug, Clone)]
pub struct CompanyEnrichment {
    pub company: String,
    pub status: FetchStatus,
    pub articles: Vec<EnrichedArticle>,
}

/// Enrich articles with topics and sentiment, one scoring call per article.
///
/// Output order matches input order. A failed or empty scoring call turns
/// that article's sentiment into [`SentimentVerdict::unknown`] without
/// affecting any other article.
pub async fn enrich(
    scorer: &dyn SentimentScorer,
    articles: Vec<RawArticle>,
) -> Vec<EnrichedArticle> {
    enrich_with_mode(scorer, articles, ScoringMode::PerArticle).await
}

/// Enrich articles using the given scoring strategy.
///
/// [`ScoringMode::Batched`] sends every summary in one call. If that call
/// errors or returns the wrong number of results, scoring falls back to one
/// call per article so failures stay isolated to the article that caused
/// them.
pub async fn enrich_with_mode(
    scorer: &dyn SentimentScorer,
    articles: Vec<RawArticle>,
    mode: ScoringMode,
) -> Vec<EnrichedArticle> {
    if articles.is_empty() {
        return Vec::new();
    }

    let verdicts = match mode {
        ScoringMode::PerArticle => score_each(scorer, &articles).await,
        ScoringMode::Batched => score_batch(scorer, &articles).await,
    };

    articles
        .into_iter()
        .zip(verdicts)
        .map(|(article, sentiment)| {
            let topics = classify(&article.combined_text());
            EnrichedArticle {
                title: article.title,
                summary: article.summary,
                topics,
                sentiment,
            }
        })
        .collect()
}

/// Fetch articles for a company and enrich them.
///
/// Upstream fetch failures are logged and produce an empty article list with
/// [`FetchStatus::UpstreamFailed`].
pub async fn run_company_enrichment(
    source: &dyn NewsSource,
    scorer: &dyn SentimentScorer,
    company_name: &str,
    limit: usize,
    mode: ScoringMode,
) -> CompanyEnrichment {
    let outcome = collect_articles(source, company_name, limit).await;
    let articles = enrich_with_mode(scorer, outcome.articles, mode).await;

    let unknown = articles.iter().filter(|a| a.sentiment.is_unknown()).count();
    if unknown > 0 {
        tracing::warn!(
            company = company_name,
            unknown,
            total = articles.len(),
            "some articles could not be scored"
        );
    }

    CompanyEnrichment {
        company: company_name.to_string(),
        status: outcome.status,
        articles,
    }
}

async fn score_each(
    scorer: &dyn SentimentScorer,
    articles: &[RawArticle],
) -> Vec<SentimentVerdict> {
    let mut verdicts = Vec::with_capacity(articles.len());
    for (index, article) in articles.iter().enumerate() {
        verdicts.push(score_one(scorer, index, &article.summary).await);
    }
    verdicts
}

async fn score_one(scorer: &dyn SentimentScorer, index: usize, summary: &str) -> SentimentVerdict {
    match scorer.score(&[summary]).await {
        Ok(results) if results.len() == 1 => results
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(SentimentVerdict::unknown),
        Ok(results) => {
            tracing::warn!(
                article = index,
                got = results.len(),
                "sentiment scorer returned no single verdict; marking unknown"
            );
            SentimentVerdict::unknown()
        }
        Err(e) => {
            tracing::warn!(
                article = index,
                error = %e,
                "sentiment scoring failed; marking unknown"
            );
            SentimentVerdict::unknown()
        }
    }
}

async fn score_batch(
    scorer: &dyn SentimentScorer,
    articles: &[RawArticle],
) -> Vec<SentimentVerdict> {
    let summaries: Vec<&str> = articles.iter().map(|a| a.summary.as_str()).collect();

    match scorer.score(&summaries).await {
        Ok(results) if results.len() == summaries.len() => results
            .into_iter()
            .map(|v| v.unwrap_or_else(SentimentVerdict::unknown))
            .collect(),
        Ok(results) => {
            tracing::warn!(
                expected = summaries.len(),
                got = results.len(),
                "batched scoring returned a mismatched count; scoring per article"
            );
            score_each(scorer, articles).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "batched scoring failed; scoring per article");
            score_each(scorer, articles).await
        }
    }
}
