//! Event processing pipeline
//!
//! Wires the chat feed, the rule store, the resolver, and the synthesis
//! engine into one handler. Events are processed strictly one at a time in
//! arrival order; a synthesis or playback failure is logged and the pipeline
//! moves on to the next event.

use async_trait::async_trait;
use thiserror::Error;

use crate::commands;
use crate::config::{ConfigStore, FilterConfig};
use crate::filter::{self, DropReason, Resolution};
use crate::stream::{ChatEvent, EventHandler, EventSource, StreamError, DEFAULT_FEED_URL};
use crate::tts::{playback, sanitize_text, SynthesisEngine, TtsError};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Tts(#[from] TtsError),
}

/// Startup parameters for the daemon pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Websocket URL of the chat feed.
    pub feed_url: String,
    /// Directory holding the rule files.
    pub config_dir: String,
    /// When false, synthesized audio is discarded instead of played.
    pub playback_enabled: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            config_dir: ".".to_string(),
            playback_enabled: true,
        }
    }
}

/// The per-event handler: rule snapshot, mutation store, and engine.
pub struct Pipeline {
    store: ConfigStore,
    config: FilterConfig,
    engine: SynthesisEngine,
    playback_enabled: bool,
}

impl Pipeline {
    /// Build a pipeline with an initial rule snapshot loaded from the store.
    pub fn new(mut store: ConfigStore, engine: SynthesisEngine, playback_enabled: bool) -> Self {
        let config = store.load();
        Self {
            store,
            config,
            engine,
            playback_enabled,
        }
    }

    /// Current rule snapshot.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    async fn speak(&self, text: &str, voice_id: &str, speaker_name: &str) -> Result<(), TtsError> {
        let utterance = sanitize_text(&format!("{} says {}", speaker_name, text));
        let audio = self.engine.synthesize(&utterance, voice_id).await?;
        tracing::debug!(bytes = audio.len(), voice = voice_id, "synthesized utterance");
        if self.playback_enabled {
            playback::play_transient(audio).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Pipeline {
    async fn handle_event(&mut self, event: ChatEvent) {
        // Pick up rule edits between events, never mid-event.
        if let Some(config) = self.store.check_and_reload() {
            tracing::info!("rule files changed, reloaded");
            self.config = config;
        }

        tracing::info!(
            speaker = %event.display_name,
            comment = %event.comment,
            "chat event"
        );

        match filter::resolve(&event, &self.config) {
            Resolution::Speak {
                text,
                voice_id,
                speaker_name,
            } => {
                if let Err(e) = self.speak(&text, &voice_id, &speaker_name).await {
                    tracing::warn!(speaker = %speaker_name, error = %e, "utterance skipped");
                }
            }
            Resolution::Command(command) => match commands::dispatch(&self.store, &command) {
                Ok(outcome) => tracing::info!(%outcome, "voice command applied"),
                Err(e) => tracing::warn!(error = %e, "voice command failed"),
            },
            Resolution::Drop(reason) => {
                let reason = match reason {
                    DropReason::MissingPrefix => "missing prefix",
                    DropReason::SilencedRole => "silenced",
                };
                tracing::debug!(speaker = %event.display_name, reason, "event dropped");
            }
        }
    }
}

/// Run the daemon pipeline until the process is terminated.
pub async fn run(settings: PipelineSettings) -> Result<(), PipelineError> {
    let engine = SynthesisEngine::new()?;
    let store = ConfigStore::new(settings.config_dir.as_str());
    let mut pipeline = Pipeline::new(store, engine, settings.playback_enabled);

    let mut source = EventSource::new(&settings.feed_url)?;
    source.run(&mut pipeline).await;
    Ok(())
}
