//! Speech synthesis
//!
//! Chunked, failover-capable text-to-speech against a prioritized list of
//! remote backends, plus local playback of the decoded audio.

pub mod endpoints;
pub mod engine;
pub mod playback;
pub mod voice;

pub use endpoints::{default_endpoints, SynthesisEndpoint};
pub use engine::{sanitize_text, split_text, ChunkFetcher, SynthesisEngine};
pub use voice::{Voice, CATALOG};

use thiserror::Error;

/// TTS errors
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("unknown voice: {0}")]
    UnknownVoice(String),

    #[error("all synthesis endpoints failed for this utterance")]
    AllEndpointsExhausted,

    #[error("audio decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("http client error: {0}")]
    Client(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("playback error: {0}")]
    Playback(String),
}

/// Result type for TTS operations
pub type Result<T> = std::result::Result<T, TtsError>;
