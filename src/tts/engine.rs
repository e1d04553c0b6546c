//! Synthesis engine
//!
//! Splits an utterance into ordered text chunks, fetches every chunk of a
//! request from one endpoint concurrently, and reassembles the base64
//! payloads in original fragment order. Failover is per request: an
//! endpoint that fails any chunk is abandoned wholesale and the next one is
//! tried, so partial results from two backends are never mixed.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures_util::future::join_all;
use regex::Regex;

use super::endpoints::{default_endpoints, SynthesisEndpoint};
use super::voice;
use super::{Result, TtsError};

/// Maximum characters per chunk accepted by the backends.
pub const MAX_CHUNK_LEN: usize = 300;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single chunk fetch. Any one of these marks the whole
/// endpoint failed for the current request.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("http status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("response missing field `{0}`")]
    MissingField(String),

    #[error("empty audio payload")]
    EmptyPayload,
}

/// Fetches the base64 audio payload for one text chunk from one endpoint.
#[async_trait]
pub trait ChunkFetcher: Send + Sync {
    async fn fetch_chunk(
        &self,
        endpoint: &SynthesisEndpoint,
        text: &str,
        voice_id: &str,
    ) -> std::result::Result<String, ChunkError>;
}

/// Production fetcher speaking the `{text, voice}` JSON POST protocol.
pub struct HttpChunkFetcher {
    client: reqwest::Client,
}

impl HttpChunkFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TtsError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChunkFetcher for HttpChunkFetcher {
    async fn fetch_chunk(
        &self,
        endpoint: &SynthesisEndpoint,
        text: &str,
        voice_id: &str,
    ) -> std::result::Result<String, ChunkError> {
        let response = self
            .client
            .post(&endpoint.url)
            .json(&serde_json::json!({ "text": text, "voice": voice_id }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChunkError::Timeout
                } else {
                    ChunkError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChunkError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChunkError::Network(e.to_string()))?;
        let payload = body
            .get(&endpoint.response_field)
            .and_then(|value| value.as_str())
            .ok_or_else(|| ChunkError::MissingField(endpoint.response_field.clone()))?;
        if payload.is_empty() {
            return Err(ChunkError::EmptyPayload);
        }
        Ok(payload.to_string())
    }
}

/// The chunking/failover engine over a prioritized endpoint list.
pub struct SynthesisEngine {
    endpoints: Vec<SynthesisEndpoint>,
    fetcher: Arc<dyn ChunkFetcher>,
}

impl SynthesisEngine {
    /// Engine over the built-in endpoints with the production HTTP fetcher.
    pub fn new() -> Result<Self> {
        Self::with_endpoints(default_endpoints())
    }

    pub fn with_endpoints(endpoints: Vec<SynthesisEndpoint>) -> Result<Self> {
        Ok(Self::with_fetcher(endpoints, Arc::new(HttpChunkFetcher::new()?)))
    }

    /// Engine with an injected fetcher; the seam tests plug fakes into.
    pub fn with_fetcher(endpoints: Vec<SynthesisEndpoint>, fetcher: Arc<dyn ChunkFetcher>) -> Self {
        Self { endpoints, fetcher }
    }

    /// Synthesize `text` with `voice_id`, trying endpoints in priority order.
    ///
    /// Validation failures (empty text, unknown voice) are rejected before
    /// any network call.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        let voice =
            voice::resolve(voice_id).ok_or_else(|| TtsError::UnknownVoice(voice_id.to_string()))?;

        let chunks = split_text(text);
        for endpoint in &self.endpoints {
            match self.fetch_all_chunks(endpoint, &chunks, voice.id).await {
                Ok(payloads) => {
                    // concatenated in original fragment order, never
                    // completion order, then decoded as one unit
                    let audio = BASE64.decode(payloads.concat())?;
                    tracing::info!(
                        endpoint = %endpoint.display_name,
                        chunks = chunks.len(),
                        bytes = audio.len(),
                        "synthesis complete"
                    );
                    return Ok(audio);
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint.display_name,
                        error = %e,
                        "endpoint failed for this request, trying next"
                    );
                }
            }
        }

        Err(TtsError::AllEndpointsExhausted)
    }

    /// All-or-nothing concurrent fetch of every chunk from one endpoint.
    /// The result vector is indexed by fragment, not by completion.
    async fn fetch_all_chunks(
        &self,
        endpoint: &SynthesisEndpoint,
        chunks: &[String],
        voice_id: &str,
    ) -> std::result::Result<Vec<String>, ChunkError> {
        let fetches = chunks
            .iter()
            .map(|chunk| self.fetcher.fetch_chunk(endpoint, chunk, voice_id));
        join_all(fetches).await.into_iter().collect()
    }
}

/// Split text into ordered fragments on sentence/clause punctuation; a
/// trailing run with no punctuation consumes the remainder. Fragments are
/// hard-capped at [`MAX_CHUNK_LEN`] characters.
pub fn split_text(text: &str) -> Vec<String> {
    static SPLITTER: OnceLock<Regex> = OnceLock::new();
    let splitter = SPLITTER.get_or_init(|| {
        Regex::new(r".*?[.,!?:;\-]|.+").expect("static splitter pattern")
    });

    let mut chunks = Vec::new();
    for found in splitter.find_iter(text) {
        let fragment = found.as_str().trim();
        if fragment.is_empty() {
            continue;
        }
        let mut rest = fragment;
        while rest.len() > MAX_CHUNK_LEN {
            let cut = floor_char_boundary(rest, MAX_CHUNK_LEN);
            if cut == 0 {
                break;
            }
            let (head, tail) = rest.split_at(cut);
            chunks.push(head.to_string());
            rest = tail;
        }
        chunks.push(rest.to_string());
    }
    chunks
}

/// Strip characters the backends cannot speak (keep letters, digits, spaces).
pub fn sanitize_text(text: &str) -> String {
    static FILTER: OnceLock<Regex> = OnceLock::new();
    let filter = FILTER.get_or_init(|| Regex::new(r"[^A-Za-z0-9 ]+").expect("static filter pattern"));
    filter.replace_all(text, "").into_owned()
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
