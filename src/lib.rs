//! Readaloud Gateway - speech proxy and offline toolkit for the school site
//!
//! This library backs the site's read-aloud mini-apps with three small pieces:
//! - A stateless HTTP gateway that proxies speech-to-text and text-to-speech
//!   requests to the upstream speech API, keeping the credential server-side
//! - A namespaced local store for per-app device persistence
//! - Connectivity tracking plus the reconnect-banner and rotator state
//!   machines that drive the mini-app shells
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              Mini-app shells                     │
//! │   banner  │  rotator  │  local store            │
//! └────────────────────┬────────────────────────────┘
//!                      │ HTTP (CORS)
//! ┌────────────────────▼────────────────────────────┐
//! │             Readaloud Gateway                    │
//! │   /api/speech/transcribe  │  /api/speech/speak  │
//! └────────────────────┬────────────────────────────┘
//!                      │ xi-api-key
//! ┌────────────────────▼────────────────────────────┐
//! │           Speech API (STT / TTS)                 │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod rotator;
pub mod speech;
pub mod store;

pub use config::{Config, CredentialProvider, EnvCredentials, SpeechConfig, StaticCredentials};
pub use connectivity::{BannerState, ConnectivityFeed, ConnectivityState, ConnectivityTracker, OfflineBanner};
pub use error::{Error, Result};
pub use rotator::{Rotator, RotatorPhase};
pub use speech::SpeechClient;
pub use store::LocalStore;
