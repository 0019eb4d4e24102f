use axum::{extract::State, Extension, Json};
use echolens_news::NewsError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SpeechRequest {
    #[serde(default)]
    pub text: String,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeechData {
    pub message: &'static str,
    pub file_path: String,
}

/// POST /api/v1/speech: translate text and synthesize it to an audio file.
pub(super) async fn convert_to_speech(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SpeechRequest>,
) -> Result<Json<ApiResponse<SpeechData>>, ApiError> {
    let rid = &req_id.0;

    if body.text.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "Text is required for speech conversion",
        ));
    }

    let lang = body
        .lang
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(state.settings.speech_lang.as_str());

    let path = state
        .speech
        .text_to_speech(&body.text, lang, None)
        .await
        .map_err(|e| map_speech_error(rid, &e))?;

    Ok(Json(ApiResponse {
        data: SpeechData {
            message: "Speech generated successfully",
            file_path: path.display().to_string(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_speech_error(rid: &str, error: &NewsError) -> ApiError {
    match error {
        NewsError::EmptyText => ApiError::new(rid, "validation_error", error.to_string()),
        NewsError::Io(_) => {
            tracing::error!(error = %error, "failed to write speech file");
            ApiError::new(rid, "internal_error", "failed to write speech file")
        }
        _ => {
            tracing::warn!(error = %error, "speech synthesis failed");
            ApiError::new(rid, "upstream_error", "speech synthesis failed")
        }
    }
}
