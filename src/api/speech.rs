//! Speech proxy endpoints
//!
//! Two stateless handlers forwarding to the upstream speech API. The
//! credential stays server-side; each request makes exactly one outbound
//! call, with no retries and no state shared between invocations. Every
//! failure - missing credential, missing input, upstream rejection - comes
//! back as a flat `{"error": ...}` body with status 500, which is what the
//! mini-app shells expect.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::speech::SpeechClient;
use crate::Error;

/// Build speech proxy router
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
        .with_state(state)
}

/// Transcription response
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Synthesis request from a mini-app
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    pub text: String,
    pub voice_id: Option<String>,
    pub speed: Option<f64>,
}

/// Transcribe audio to text
///
/// Accepts `multipart/form-data` with a binary `audio` field.
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    mut form: Multipart,
) -> Result<Json<TranscribeResponse>, SpeechError> {
    let client = speech_client(&state)?;

    let mut audio = None;
    while let Some(field) = form
        .next_field()
        .await
        .map_err(|e| Error::InvalidRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let file_name = field.file_name().unwrap_or("audio.webm").to_string();
            let mime = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidRequest(format!("failed to read audio field: {e}")))?;
            audio = Some((bytes, file_name, mime));
        }
    }

    let (bytes, file_name, mime) =
        audio.ok_or_else(|| Error::InvalidRequest("no audio field in form".to_string()))?;

    let text = client.transcribe(bytes.to_vec(), &file_name, &mime).await?;
    Ok(Json(TranscribeResponse { text }))
}

/// Synthesize text to speech
///
/// Accepts JSON `{text, voiceId?, speed?}`; returns MP3 bytes with caching
/// disabled. The body is parsed by hand so a malformed request still gets
/// the uniform error shape.
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    body: Bytes,
) -> Result<Response, SpeechError> {
    let client = speech_client(&state)?;

    let request: SynthesizeRequest = serde_json::from_slice(&body)
        .map_err(|e| Error::InvalidRequest(format!("bad request body: {e}")))?;

    let audio = client
        .synthesize(&request.text, request.voice_id.as_deref(), request.speed)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        audio,
    )
        .into_response())
}

/// Build the upstream client, failing fast when the credential is absent
fn speech_client(state: &ApiState) -> Result<SpeechClient, SpeechError> {
    let api_key = state
        .credentials
        .speech_api_key()
        .ok_or_else(|| Error::Config("speech API key not configured".to_string()))?;
    Ok(SpeechClient::new(
        state.http.clone(),
        state.speech.clone(),
        api_key,
    )?)
}

/// Error wrapper giving every failure the uniform `{"error": ...}` shape
#[derive(Debug)]
pub struct SpeechError(Error);

impl From<Error> for SpeechError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for SpeechError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        tracing::warn!(error = %self.0, "speech proxy request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
