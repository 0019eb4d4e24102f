//! News enrichment pipeline for `EchoLens`.
//!
//! Fetches company news from `NewsAPI` and tags each article with keyword
//! topics plus a sentiment verdict from a hosted model. A separate speech
//! client narrates text as translated audio.

pub mod error;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod sources;
pub mod speech;
pub mod topics;
pub mod types;

pub use echolens_core::ScoringMode;
pub use error::NewsError;
pub use pipeline::{enrich, enrich_with_mode, run_company_enrichment, CompanyEnrichment};
pub use report::CoverageReport;
pub use scorer::{map_model_label, HfSentimentClient, SentimentScorer};
pub use sources::{collect_articles, FetchOutcome, FetchStatus, NewsApiClient, NewsSource};
pub use speech::SpeechClient;
pub use topics::classify;
pub use types::{
    EnrichedArticle, RawArticle, SentimentLabel, SentimentVerdict, Topic, TopicSet,
    SUMMARY_PLACEHOLDER, TITLE_PLACEHOLDER,
};
