//! Configuration management for the readaloud gateway

use std::sync::Arc;

use crate::Result;

/// Default port for the gateway API server
pub const DEFAULT_PORT: u16 = 8787;

/// Default voice identifier used when the caller does not pick one
pub const DEFAULT_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";

/// Default speech rate. Deliberately slower than natural speech; the
/// read-aloud apps target early readers.
pub const DEFAULT_SPEED: f64 = 0.85;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the API server listens on
    pub port: u16,

    /// Speech proxy configuration
    pub speech: SpeechConfig,
}

/// Upstream speech API configuration
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Base URL of the speech API
    pub api_url: String,

    /// Transcription model identifier
    pub stt_model: String,

    /// Synthesis model identifier
    pub tts_model: String,

    /// Voice used when the request does not specify one
    pub default_voice: String,

    /// Speech rate used when the request does not specify one
    pub default_speed: f64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.elevenlabs.io".to_string(),
            stt_model: "scribe_v2".to_string(),
            tts_model: "eleven_multilingual_v2".to_string(),
            default_voice: DEFAULT_VOICE_ID.to_string(),
            default_speed: DEFAULT_SPEED,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns error if the environment holds unusable values (reserved; the
    /// current fields all fall back to defaults)
    pub fn load() -> Result<Self> {
        let port = std::env::var("READALOUD_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let defaults = SpeechConfig::default();
        let speech = SpeechConfig {
            api_url: std::env::var("READALOUD_SPEECH_URL").unwrap_or(defaults.api_url),
            stt_model: defaults.stt_model,
            tts_model: defaults.tts_model,
            default_voice: std::env::var("READALOUD_TTS_VOICE").unwrap_or(defaults.default_voice),
            default_speed: std::env::var("READALOUD_TTS_SPEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_speed),
        };

        Ok(Self { port, speech })
    }
}

/// Source of the upstream speech API credential
///
/// Handlers look the key up per request so they stay testable without a live
/// environment and pick up rotation without a restart.
pub trait CredentialProvider: Send + Sync {
    /// The speech API key, or `None` when the gateway is not configured
    fn speech_api_key(&self) -> Option<String>;
}

/// Reads the credential from `ELEVENLABS_API_KEY`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn speech_api_key(&self) -> Option<String> {
        std::env::var("ELEVENLABS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
    }
}

/// Fixed credential, used by tests and embedded deployments
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(pub Option<String>);

impl CredentialProvider for StaticCredentials {
    fn speech_api_key(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Shared credential provider handle
pub type SharedCredentials = Arc<dyn CredentialProvider>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_credentials_roundtrip() {
        let creds = StaticCredentials(Some("xi-test".to_string()));
        assert_eq!(creds.speech_api_key().as_deref(), Some("xi-test"));

        let empty = StaticCredentials(None);
        assert!(empty.speech_api_key().is_none());
    }

    #[test]
    fn speech_defaults() {
        let speech = SpeechConfig::default();
        assert_eq!(speech.stt_model, "scribe_v2");
        assert_eq!(speech.tts_model, "eleven_multilingual_v2");
        assert!((speech.default_speed - 0.85).abs() < f64::EPSILON);
    }
}
