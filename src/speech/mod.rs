//! Upstream speech API client
//!
//! One client covers both directions: multipart transcription and JSON
//! synthesis. The gateway holds the API key; callers never see it.

use serde::Serialize;

use crate::config::SpeechConfig;
use crate::{Error, Result};

/// Voice-quality settings sent with every synthesis request. Tuned once for
/// the read-aloud voice; only `speed` is caller-overridable.
const STABILITY: f64 = 0.5;
const SIMILARITY_BOOST: f64 = 0.75;
const STYLE: f64 = 0.0;
const USE_SPEAKER_BOOST: bool = true;

/// Response from the upstream transcription endpoint
#[derive(serde::Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
    style: f64,
    use_speaker_boost: bool,
    speed: f64,
}

#[derive(Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

/// Client for the upstream speech API
#[derive(Debug)]
pub struct SpeechClient {
    client: reqwest::Client,
    config: SpeechConfig,
    api_key: String,
}

impl SpeechClient {
    /// Create a new speech client
    ///
    /// Takes the shared HTTP client so per-request construction reuses the
    /// connection pool.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(client: reqwest::Client, config: SpeechConfig, api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config("speech API key required".to_string()));
        }

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Transcribe audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - recorded audio bytes, any container the upstream accepts
    /// * `file_name` - original form file name, passed through for sniffing
    /// * `mime` - declared content type of the audio
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the upstream rejects it
    pub async fn transcribe(&self, audio: Vec<u8>, file_name: &str, mime: &str) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), mime, "starting transcription");

        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| Error::InvalidRequest(format!("bad audio content type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model_id", self.config.stt_model.clone())
            .text("tag_audio_events", "false")
            .text("diarize", "false")
            .text("language_code", "eng");

        let response = self
            .client
            .post(format!("{}/v1/speech-to-text", self.config.api_url))
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "transcription request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received transcription response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let result: TranscriptionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse transcription response");
            e
        })?;

        tracing::info!(chars = result.text.len(), "transcription complete");
        Ok(result.text)
    }

    /// Synthesize text to speech
    ///
    /// # Arguments
    ///
    /// * `text` - text to read aloud
    /// * `voice_id` - voice override, or `None` for the configured default
    /// * `speed` - rate override, or `None` for the configured default
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3)
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the upstream rejects it
    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: Option<&str>,
        speed: Option<f64>,
    ) -> Result<Vec<u8>> {
        let voice = voice_id.unwrap_or(&self.config.default_voice);
        let speed = speed.unwrap_or(self.config.default_speed);

        tracing::debug!(chars = text.len(), voice, speed, "starting synthesis");

        let body = SynthesisBody {
            text,
            model_id: &self.config.tts_model,
            voice_settings: VoiceSettings {
                stability: STABILITY,
                similarity_boost: SIMILARITY_BOOST,
                style: STYLE,
                use_speaker_boost: USE_SPEAKER_BOOST,
                speed,
            },
        };

        let response = self
            .client
            .post(format!(
                "{}/v1/text-to-speech/{voice}",
                self.config.api_url
            ))
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "synthesis request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received synthesis response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "synthesis API error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let audio = response.bytes().await?;
        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
