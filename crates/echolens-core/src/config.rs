use crate::app_config::{AppConfig, Environment, ScoringMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("ECHOLENS_ENV", "development"))?;
    let bind_addr = parse("ECHOLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ECHOLENS_LOG_LEVEL", "info");

    let newsapi_api_key = optional("NEWSAPI_API_KEY");
    let newsapi_base_url = or_default("ECHOLENS_NEWSAPI_BASE_URL", "https://newsapi.org");
    let article_limit = parse_usize("ECHOLENS_ARTICLE_LIMIT", "15")?;
    if article_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ECHOLENS_ARTICLE_LIMIT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let sentiment_base_url = or_default(
        "ECHOLENS_SENTIMENT_BASE_URL",
        "https://api-inference.huggingface.co",
    );
    let sentiment_model = or_default(
        "ECHOLENS_SENTIMENT_MODEL",
        "cardiffnlp/twitter-roberta-base-sentiment",
    );
    let hf_api_token = optional("HF_API_TOKEN");
    let scoring_mode = parse_scoring_mode(&or_default("ECHOLENS_SCORING_MODE", "per_article"))?;

    let translate_base_url = or_default(
        "ECHOLENS_TRANSLATE_BASE_URL",
        "https://translate.googleapis.com",
    );
    let tts_base_url = or_default("ECHOLENS_TTS_BASE_URL", "https://translate.google.com");
    let speech_lang = or_default("ECHOLENS_SPEECH_LANG", "hi");
    let audio_dir = PathBuf::from(or_default("ECHOLENS_AUDIO_DIR", "./audio"));
    let speech_tokens = optional("ECHOLENS_SPEECH_TOKENS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let company_lookups_per_minute = parse_usize("ECHOLENS_COMPANY_LOOKUPS_PER_MINUTE", "30")?;
    if company_lookups_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "ECHOLENS_COMPANY_LOOKUPS_PER_MINUTE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let request_timeout_secs = parse_u64("ECHOLENS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ECHOLENS_USER_AGENT", "echolens/0.1 (news-insights)");

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        newsapi_api_key,
        newsapi_base_url,
        article_limit,
        sentiment_base_url,
        sentiment_model,
        hf_api_token,
        scoring_mode,
        translate_base_url,
        tts_base_url,
        speech_lang,
        audio_dir,
        speech_tokens,
        company_lookups_per_minute,
        request_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ECHOLENS_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_scoring_mode(s: &str) -> Result<ScoringMode, ConfigError> {
    match s {
        "per_article" => Ok(ScoringMode::PerArticle),
        "batched" => Ok(ScoringMode::Batched),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ECHOLENS_SCORING_MODE".to_string(),
            reason: format!("expected per_article or batched; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
