//! Text-to-speech: translate English text, then synthesize it to an MP3 file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use echolens_core::AppConfig;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;
use uuid::Uuid;

use crate::error::NewsError;

/// Language the input text is assumed to be written in.
const SOURCE_LANG: &str = "en";

/// Maximum characters the speech endpoint accepts per request.
const MAX_CHUNK_CHARS: usize = 100;

/// Translation + speech synthesis client backed by the Google Translate web endpoints.
pub struct SpeechClient {
    client: reqwest::Client,
    translate_base_url: String,
    tts_base_url: String,
    output_dir: PathBuf,
}

impl SpeechClient {
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        translate_base_url: &str,
        tts_base_url: &str,
        output_dir: impl Into<PathBuf>,
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
            translate_base_url: translate_base_url.trim_end_matches('/').to_string(),
            tts_base_url: tts_base_url.trim_end_matches('/').to_string(),
            output_dir: output_dir.into(),
        })
    }

    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NewsError> {
        Self::new(
            &config.translate_base_url,
            &config.tts_base_url,
            config.audio_dir.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Translate English `text` into `target_lang`.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Translate`] on a non-success status, an
    /// unparseable body, or an empty translation.
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String, NewsError> {
        let url = format!(
            "{}/translate_a/single?client=gtx&sl={SOURCE_LANG}&tl={}&dt=t&q={}",
            self.translate_base_url,
            utf8_percent_encode(target_lang, NON_ALPHANUMERIC),
            utf8_percent_encode(text, NON_ALPHANUMERIC),
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(NewsError::Translate(format!(
                "translation returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NewsError::Translate(format!("response parse error: {e}")))?;

        let translated = parse_translation(&body);
        if translated.trim().is_empty() {
            return Err(NewsError::Translate("empty translation".to_string()));
        }
        Ok(translated)
    }

    /// Synthesize `text` spoken in `lang` and return the MP3 bytes.
    ///
    /// Long text is split into chunks on word boundaries; the per-chunk audio
    /// is concatenated in order.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::EmptyText`] for blank input, or
    /// [`NewsError::Speech`] if any chunk request fails or returns no audio.
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, NewsError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(NewsError::EmptyText);
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = format!(
                "{}/translate_tts?ie=UTF-8&client=tw-ob&tl={}&total={}&idx={idx}&q={}",
                self.tts_base_url,
                utf8_percent_encode(lang, NON_ALPHANUMERIC),
                chunks.len(),
                utf8_percent_encode(chunk, NON_ALPHANUMERIC),
            );

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| NewsError::Speech(format!("request failed: {e}")))?;
            if !response.status().is_success() {
                return Err(NewsError::Speech(format!(
                    "speech endpoint returned status {} for chunk {idx}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| NewsError::Speech(format!("failed to read audio: {e}")))?;
            if bytes.is_empty() {
                return Err(NewsError::Speech(format!(
                    "no audio returned for chunk {idx}"
                )));
            }
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }

    /// Translate `text` into `lang`, synthesize it, and write an MP3 file.
    ///
    /// When `file_name` is `None` a unique name is generated inside the
    /// output directory. If translation fails the original text is spoken.
    /// Returns the absolute path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::EmptyText`] for blank input, [`NewsError::Speech`]
    /// if synthesis fails, or [`NewsError::Io`] if the file cannot be written.
    pub async fn text_to_speech(
        &self,
        text: &str,
        lang: &str,
        file_name: Option<&str>,
    ) -> Result<PathBuf, NewsError> {
        if text.trim().is_empty() {
            return Err(NewsError::EmptyText);
        }

        let spoken = if lang == SOURCE_LANG {
            text.to_string()
        } else {
            match self.translate(text, lang).await {
                Ok(translated) => translated,
                Err(e) => {
                    tracing::warn!(lang, error = %e, "translation failed; speaking original text");
                    text.to_string()
                }
            }
        };

        let audio = self.synthesize(&spoken, lang).await?;

        let name = file_name.map_or_else(
            || format!("speech-{}.mp3", Uuid::new_v4()),
            ToString::to_string,
        );
        let path = self.output_dir.join(name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &audio).await?;

        let absolute = std::path::absolute(&path)?;
        tracing::debug!(path = %absolute.display(), bytes = audio.len(), "wrote speech file");
        Ok(absolute)
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["translated", "original", ...], ...], ...]`.
fn parse_translation(body: &Value) -> String {
    body.get(0)
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|segment| segment.get(0).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Split text into chunks of at most `max_chars` characters on whitespace.
///
/// Words longer than `max_chars` are split mid-word.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            chunks.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let word_len = word.chars().count();
        if !current.is_empty() && current_len + 1 + word_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_text_blank_is_empty() {
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn chunk_text_short_text_is_single_chunk() {
        assert_eq!(chunk_text("hello  world", 100), vec!["hello world"]);
    }

    #[test]
    fn chunk_text_splits_on_word_boundaries() {
        let chunks = chunk_text("aaaa bbbb cccc", 9);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn chunk_text_splits_overlong_words() {
        let chunks = chunk_text("abcdefghij xy", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn chunk_text_counts_characters_not_bytes() {
        let text = "नमस्ते दुनिया";
        let chunks = chunk_text(text, 100);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn parse_translation_joins_segments() {
        let body = serde_json::json!([
            [["नमस्ते ", "hello ", null], ["दुनिया", "world", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_translation(&body), "नमस्ते दुनिया");
    }

    #[test]
    fn parse_translation_of_unexpected_shape_is_empty() {
        assert_eq!(parse_translation(&serde_json::json!({"error": "x"})), "");
    }
}
