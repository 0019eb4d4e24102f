use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("NewsAPI error: {0}")]
    NewsApi(String),

    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("sentiment model error: {0}")]
    Sentiment(String),

    #[error("translation error: {0}")]
    Translate(String),

    #[error("speech synthesis error: {0}")]
    Speech(String),

    #[error("text is required for speech conversion")]
    EmptyText,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
