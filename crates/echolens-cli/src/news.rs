//! Article fetch and coverage report command handlers.

use chrono::Utc;
use echolens_core::AppConfig;
use echolens_news::{
    run_company_enrichment, CompanyEnrichment, CoverageReport, EnrichedArticle, FetchStatus,
    HfSentimentClient, NewsApiClient,
};

/// Fetch and enrich coverage for one company using the configured clients.
///
/// # Errors
///
/// Returns an error if a client cannot be built or the news source failed.
async fn load_enrichment(
    config: &AppConfig,
    company: &str,
    limit: Option<usize>,
) -> anyhow::Result<CompanyEnrichment> {
    let company = company.trim();
    if company.is_empty() {
        anyhow::bail!("company name is required");
    }

    let source = NewsApiClient::from_app_config(config)?;
    let scorer = HfSentimentClient::from_app_config(config)?;
    let limit = limit.unwrap_or(config.article_limit);
    tracing::info!(company, limit, mode = %config.scoring_mode, "fetching coverage");

    let enrichment =
        run_company_enrichment(&source, &scorer, company, limit, config.scoring_mode).await;

    if enrichment.status == FetchStatus::UpstreamFailed {
        anyhow::bail!("news source unavailable while fetching articles for '{company}'");
    }
    Ok(enrichment)
}

/// Print enriched articles for a company.
///
/// # Errors
///
/// Returns an error if the news source fails or JSON serialization fails.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    company: &str,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let enrichment = load_enrichment(config, company, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&enrichment.articles)?);
        return Ok(());
    }

    if enrichment.articles.is_empty() {
        println!("no articles found for '{}'", enrichment.company);
        return Ok(());
    }

    for (index, article) in enrichment.articles.iter().enumerate() {
        println!("{}", render_article(index + 1, article));
        println!();
    }

    Ok(())
}

/// Print a markdown coverage report for a company.
///
/// # Errors
///
/// Returns an error if the news source fails.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    company: &str,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let enrichment = load_enrichment(config, company, limit).await?;

    if enrichment.articles.is_empty() {
        println!("no articles available for comparative analysis");
        return Ok(());
    }

    let report = CoverageReport::from_articles(&enrichment.articles);
    for line in render_report(&enrichment.company, &report) {
        println!("{line}");
    }

    Ok(())
}

pub(crate) fn render_article(position: usize, article: &EnrichedArticle) -> String {
    format!(
        "{position}. {}\n   Summary:   {}\n   Topics:    {}\n   Sentiment: {} ({:.2})",
        article.title,
        article.summary,
        article.topics.joined(),
        article.sentiment.label,
        article.sentiment.score,
    )
}

pub(crate) fn render_report(company: &str, report: &CoverageReport) -> Vec<String> {
    let now = Utc::now().format("%Y-%m-%d %H:%M UTC");
    let dominant = report
        .dominant_sentiment()
        .map_or_else(|| "n/a".to_string(), |label| label.to_string());

    let mut lines = vec![
        format!("# Coverage Report: {company}"),
        String::new(),
        format!("**Generated**: {now}"),
        format!("**Articles**: {}", report.article_count),
        format!("**Dominant sentiment**: {dominant}"),
        String::new(),
        "| Sentiment | Articles |".to_string(),
        "|-----------|----------|".to_string(),
    ];
    lines.extend(
        report
            .sentiment_distribution
            .iter()
            .map(|(label, count)| format!("| {label} | {count} |")),
    );

    lines.push(String::new());
    lines.push("| Topic | Articles |".to_string());
    lines.push("|-------|----------|".to_string());
    lines.extend(
        report
            .topic_counts
            .iter()
            .map(|(topic, count)| format!("| {topic} | {count} |")),
    );

    let unique: Vec<&str> = report.unique_topics.iter().map(|t| t.as_str()).collect();
    lines.push(String::new());
    lines.push(format!("**Unique topics**: {}", unique.join(", ")));
    lines
}
