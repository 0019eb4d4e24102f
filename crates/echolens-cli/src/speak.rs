//! Text-to-speech command handler.

use std::path::{Path, PathBuf};

use echolens_core::AppConfig;
use echolens_news::SpeechClient;

/// Translate and synthesize `text`, then print the written file path.
///
/// # Errors
///
/// Returns an error if the text is blank, the output path has no file name,
/// synthesis fails, or the file cannot be written.
pub(crate) async fn run_speak(
    config: &AppConfig,
    text: &str,
    lang: Option<&str>,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let lang = lang.unwrap_or(config.speech_lang.as_str());
    let (client, file_name) = speech_client(config, out)?;

    let written = client
        .text_to_speech(text, lang, file_name.as_deref())
        .await?;
    println!("{}", written.display());
    Ok(())
}

/// Build the speech client, writing into `--out`'s directory when given.
///
/// Only the speech settings are read, so this works without a news source key.
pub(crate) fn speech_client(
    config: &AppConfig,
    out: Option<&Path>,
) -> anyhow::Result<(SpeechClient, Option<String>)> {
    let Some(path) = out else {
        return Ok((SpeechClient::from_app_config(config)?, None));
    };

    let (dir, name) = split_output_path(path)?;
    let client = SpeechClient::new(
        &config.translate_base_url,
        &config.tts_base_url,
        dir,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    Ok((client, Some(name)))
}

/// Split `--out` into the directory to write into and the file name.
pub(crate) fn split_output_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("output path '{}' has no file name", path.display()))?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    Ok((dir, name.to_string()))
}
