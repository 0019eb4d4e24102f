use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How article summaries are sent to the sentiment model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoringMode {
    /// One single-element scoring call per article.
    #[default]
    PerArticle,
    /// One call for the whole article list, falling back to per-article
    /// calls when the batch fails or comes back short.
    Batched,
}

impl std::fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringMode::PerArticle => write!(f, "per_article"),
            ScoringMode::Batched => write!(f, "batched"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Only the news source needs this. Speech works without it.
    pub newsapi_api_key: Option<String>,
    pub newsapi_base_url: String,
    pub article_limit: usize,
    pub sentiment_base_url: String,
    pub sentiment_model: String,
    pub hf_api_token: Option<String>,
    pub scoring_mode: ScoringMode,
    pub translate_base_url: String,
    pub tts_base_url: String,
    pub speech_lang: String,
    pub audio_dir: PathBuf,
    /// Bearer tokens accepted by the speech route. Empty means no tokens
    /// were configured.
    pub speech_tokens: Vec<String>,
    /// Lookups allowed per company name per minute on the article routes.
    pub company_lookups_per_minute: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "newsapi_api_key",
                &self.newsapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("article_limit", &self.article_limit)
            .field("sentiment_base_url", &self.sentiment_base_url)
            .field("sentiment_model", &self.sentiment_model)
            .field(
                "hf_api_token",
                &self.hf_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("scoring_mode", &self.scoring_mode)
            .field("translate_base_url", &self.translate_base_url)
            .field("tts_base_url", &self.tts_base_url)
            .field("speech_lang", &self.speech_lang)
            .field("audio_dir", &self.audio_dir)
            .field("speech_tokens", &self.speech_tokens.len())
            .field(
                "company_lookups_per_minute",
                &self.company_lookups_per_minute,
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
