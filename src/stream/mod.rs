//! Chat event stream
//!
//! Long-lived websocket connection to the chat event feed. Each wire message
//! is a JSON envelope `{event, data}`; only `chat` events are acted on. On
//! any transport-level close or refusal the source waits a fixed short delay
//! and reconnects, indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

/// Default feed URL of the local chat relay.
pub const DEFAULT_FEED_URL: &str = "ws://localhost:21213/";

const RETRY_DELAY: Duration = Duration::from_secs(2);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Stream errors
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid feed url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Connection lifecycle of the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One chat message as received from the feed. Immutable once received.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    #[serde(rename = "nickname", default)]
    pub display_name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_moderator: bool,
    #[serde(default)]
    pub is_subscriber: bool,
    /// Top gifter rank, 1..=5 when present. The feed sends this as a number
    /// or a numeric string depending on the client version.
    #[serde(default, deserialize_with = "deserialize_rank")]
    pub top_gifter_rank: Option<u32>,
    /// 0 = not following, 1 = follower, 2 = friend.
    #[serde(default)]
    pub follow_role: u8,
    #[serde(skip_deserializing, default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl ChatEvent {
    /// Create an event with default role flags.
    pub fn new(display_name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            comment: comment.into(),
            is_moderator: false,
            is_subscriber: false,
            top_gifter_rank: None,
            follow_role: 0,
            received_at: Utc::now(),
        }
    }

    pub fn as_moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }

    pub fn as_subscriber(mut self) -> Self {
        self.is_subscriber = true;
        self
    }

    pub fn with_top_gifter_rank(mut self, rank: u32) -> Self {
        self.top_gifter_rank = Some(rank);
        self
    }

    pub fn with_follow_role(mut self, role: u8) -> Self {
        self.follow_role = role;
        self
    }
}

fn deserialize_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().map(|n| n as u32),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// Parse one wire message into a chat event.
///
/// Non-JSON messages, non-chat envelopes, and malformed chat payloads are
/// all discarded without affecting the stream.
pub fn parse_event(raw: &str) -> Option<ChatEvent> {
    let envelope: Envelope = serde_json::from_str(raw).ok()?;
    if envelope.event != "chat" {
        return None;
    }
    match serde_json::from_value(envelope.data) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "discarding malformed chat payload");
            None
        }
    }
}

/// Handler invoked for each chat event, strictly one at a time.
#[async_trait]
pub trait EventHandler: Send {
    async fn handle_event(&mut self, event: ChatEvent);
}

/// The feed connection with its reconnect state machine.
pub struct EventSource {
    url: Url,
    retry_delay: Duration,
    state: ConnectionState,
}

impl EventSource {
    pub fn new(url: &str) -> Result<Self, StreamError> {
        Ok(Self {
            url: Url::parse(url)?,
            retry_delay: RETRY_DELAY,
            state: ConnectionState::Disconnected,
        })
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Connect and consume events forever, reconnecting with a fixed delay
    /// on every transport failure. Only process termination stops this loop.
    pub async fn run(&mut self, handler: &mut (dyn EventHandler + Send)) {
        loop {
            self.state = ConnectionState::Connecting;
            match connect_async(self.url.as_str()).await {
                Ok((ws, _)) => {
                    self.state = ConnectionState::Connected;
                    tracing::info!(url = %self.url, "connected to chat feed");
                    self.consume(ws, handler).await;
                }
                Err(e) => {
                    tracing::warn!(url = %self.url, error = %e, "chat feed connection failed");
                }
            }
            self.state = ConnectionState::Disconnected;
            tracing::info!(
                delay_secs = self.retry_delay.as_secs(),
                "reconnecting to chat feed"
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    async fn consume(&mut self, mut ws: WsStream, handler: &mut (dyn EventHandler + Send)) {
        while let Some(message) = ws.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(event) = parse_event(&text) {
                        // The next frame is not read until this event's full
                        // pipeline completes; slow synthesis throttles
                        // ingestion instead of queueing.
                        handler.handle_event(event).await;
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::warn!("chat feed closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "chat feed transport error");
                    break;
                }
            }
        }
    }
}
