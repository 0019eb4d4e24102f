//! Sentiment scoring via a hosted text-classification model.

use std::time::Duration;

use async_trait::async_trait;
use echolens_core::AppConfig;
use serde::{Deserialize, Serialize};

use crate::error::NewsError;
use crate::types::{SentimentLabel, SentimentVerdict};

/// Model class code to sentiment label.
///
/// Codes follow `cardiffnlp/twitter-roberta-base-sentiment`. Swapping the
/// model only requires changing this table.
pub(crate) const MODEL_LABELS: &[(&str, SentimentLabel)] = &[
    ("LABEL_0", SentimentLabel::Negative),
    ("LABEL_1", SentimentLabel::Neutral),
    ("LABEL_2", SentimentLabel::Positive),
];

/// Map a model class code to a sentiment label. Unknown codes yield `None`.
#[must_use]
pub fn map_model_label(code: &str) -> Option<SentimentLabel> {
    MODEL_LABELS
        .iter()
        .find(|(model_code, _)| *model_code == code)
        .map(|&(_, label)| label)
}

/// Anything that can score a batch of texts.
///
/// Implementations return one entry per input, in input order. `None` marks
/// an input the model produced no usable verdict for. Empty input must yield
/// an empty output.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`NewsError`] when the whole call fails.
    async fn score(&self, texts: &[&str]) -> Result<Vec<Option<SentimentVerdict>>, NewsError>;
}

/// Client for the Hugging Face Inference API text-classification endpoint.
pub struct HfSentimentClient {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct ModelPrediction {
    label: String,
    score: f32,
}

/// The API returns either every class per input or only the top class.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModelOutput {
    PerInput(Vec<Vec<ModelPrediction>>),
    TopOnly(Vec<ModelPrediction>),
}

impl HfSentimentClient {
    /// Create a client for `{base_url}/models/{model}`.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/models/{model}", base_url.trim_end_matches('/')),
            api_token,
        })
    }

    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NewsError> {
        Self::new(
            &config.sentiment_base_url,
            &config.sentiment_model,
            config.hf_api_token.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }
}

#[async_trait]
impl SentimentScorer for HfSentimentClient {
    /// Classify all texts in one request.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Sentiment`] if the request fails, the model
    /// returns a non-success status, or the body cannot be parsed.
    async fn score(&self, texts: &[&str]) -> Result<Vec<Option<SentimentVerdict>>, NewsError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { inputs: texts });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NewsError::Sentiment(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(NewsError::Sentiment(format!(
                "model returned status {}",
                response.status()
            )));
        }

        let output: ModelOutput = response
            .json()
            .await
            .map_err(|e| NewsError::Sentiment(format!("response parse error: {e}")))?;

        let verdicts: Vec<Option<SentimentVerdict>> = match output {
            ModelOutput::PerInput(per_input) => per_input
                .into_iter()
                .map(|classes| top_verdict(&classes))
                .collect(),
            ModelOutput::TopOnly(top) => top
                .iter()
                .map(|p| top_verdict(std::slice::from_ref(p)))
                .collect(),
        };

        if verdicts.len() != texts.len() {
            tracing::warn!(
                expected = texts.len(),
                got = verdicts.len(),
                "sentiment model returned a mismatched number of results"
            );
        }

        Ok(verdicts)
    }
}

/// Pick the highest-confidence class and map it to a verdict.
fn top_verdict(classes: &[ModelPrediction]) -> Option<SentimentVerdict> {
    let best = classes.iter().max_by(|a, b| a.score.total_cmp(&b.score))?;
    let Some(label) = map_model_label(&best.label) else {
        tracing::debug!(code = %best.label, "unrecognized sentiment model label");
        return None;
    };
    Some(SentimentVerdict::new(label, best.score))
}
