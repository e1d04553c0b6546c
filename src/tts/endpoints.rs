//! Synthesis backends
//!
//! Each backend speaks the same `{text, voice}` POST protocol but returns
//! its base64 audio under a different response field, so every endpoint is
//! a small tagged record rather than a special case.

use serde::{Deserialize, Serialize};

/// A remote synthesis backend, tried in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisEndpoint {
    /// POST target for `{text, voice}` requests.
    pub url: String,
    /// JSON field holding the base64 audio payload.
    pub response_field: String,
    /// Short name used in logs.
    pub display_name: String,
}

impl SynthesisEndpoint {
    pub fn new(
        url: impl Into<String>,
        response_field: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            response_field: response_field.into(),
            display_name: display_name.into(),
        }
    }
}

/// The built-in backend list, in priority order.
pub fn default_endpoints() -> Vec<SynthesisEndpoint> {
    vec![
        SynthesisEndpoint::new(
            "https://tiktok-tts.weilnet.workers.dev/api/generation",
            "data",
            "weilnet",
        ),
        SynthesisEndpoint::new("https://countik.com/api/text/speech", "v_data", "countik"),
        SynthesisEndpoint::new("https://gesserit.co/api/tiktok-tts", "base64", "gesserit"),
    ]
}
