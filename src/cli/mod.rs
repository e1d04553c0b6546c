//! CLI subcommand definitions and handlers.
//!
//! Uses clap derive to define the subcommand hierarchy:
//! - `start` (default) -- run the chat-to-speech daemon
//! - `say` -- synthesize a one-off utterance to a file
//! - `voices` -- list the voice catalog
//! - `config show|path` -- inspect the loaded rule files
//! - `version` -- print build/version info

use clap::{Parser, Subcommand};

/// Chatvox live-chat text-to-speech daemon.
#[derive(Parser, Debug)]
#[command(
    name = "vox",
    version = env!("CARGO_PKG_VERSION"),
    about = "Chatvox — read live chat aloud with per-speaker voices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the daemon (default when no subcommand is given).
    Start {
        /// Websocket URL of the chat feed.
        #[arg(short, long, default_value = crate::stream::DEFAULT_FEED_URL)]
        url: String,

        /// Directory holding the rule files.
        #[arg(short, long, default_value = ".")]
        config_dir: String,

        /// Default log filter when RUST_LOG is unset.
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Synthesize but never play audio.
        #[arg(long)]
        no_playback: bool,
    },

    /// Synthesize one utterance and write it to an audio file.
    Say {
        /// Text to speak.
        #[arg(short = 't', long, conflicts_with = "text_file")]
        text: Option<String>,

        /// Read the text from a file instead.
        #[arg(short = 'f', long)]
        text_file: Option<String>,

        /// Voice name or id (see `vox voices`).
        #[arg(short, long, default_value = crate::config::types::FALLBACK_VOICE_ID)]
        voice: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.mp3")]
        output: String,

        /// Play the audio after writing it, then delete the file.
        #[arg(long)]
        play: bool,
    },

    /// List all voices in the catalog.
    Voices,

    /// Inspect the loaded rule files.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print version, build date, and git commit information.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the fully loaded rule snapshot as JSON.
    Show {
        /// Directory holding the rule files.
        #[arg(short, long, default_value = ".")]
        config_dir: String,
    },

    /// Print the rule file paths that the daemon watches.
    Path {
        /// Directory holding the rule files.
        #[arg(short, long, default_value = ".")]
        config_dir: String,
    },
}

// ---------------------------------------------------------------------------
// Subcommand handlers
// ---------------------------------------------------------------------------

use crate::config::ConfigStore;
use crate::logging;
use crate::pipeline::{self, PipelineSettings};
use crate::tts::{playback, sanitize_text, SynthesisEngine, CATALOG};

/// Dispatch a parsed command line. No subcommand means `start`.
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        None => handle_start(
            crate::stream::DEFAULT_FEED_URL.to_string(),
            ".".to_string(),
            "info".to_string(),
            false,
        ),
        Some(Command::Start {
            url,
            config_dir,
            log_level,
            no_playback,
        }) => handle_start(url, config_dir, log_level, no_playback),
        Some(Command::Say {
            text,
            text_file,
            voice,
            output,
            play,
        }) => handle_say(text, text_file, &voice, &output, play),
        Some(Command::Voices) => {
            handle_voices();
            Ok(())
        }
        Some(Command::Config(ConfigCommand::Show { config_dir })) => {
            handle_config_show(&config_dir)
        }
        Some(Command::Config(ConfigCommand::Path { config_dir })) => {
            handle_config_path(&config_dir);
            Ok(())
        }
        Some(Command::Version) => {
            handle_version();
            Ok(())
        }
    }
}

/// Run the `start` subcommand: the daemon loop until Ctrl-C.
fn handle_start(
    url: String,
    config_dir: String,
    log_level: String,
    no_playback: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    logging::init(&log_level);

    let settings = PipelineSettings {
        feed_url: url,
        config_dir,
        playback_enabled: !no_playback,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::select! {
            result = pipeline::run(settings) => result.map_err(Into::into),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}

/// Run the `say` subcommand.
fn handle_say(
    text: Option<String>,
    text_file: Option<String>,
    voice: &str,
    output: &str,
    play: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match (text, text_file) {
        // Inline text gets the same sanitization as chat; file input is
        // assumed to be pre-cleaned.
        (Some(t), _) => sanitize_text(&t),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("provide text with --text or --text-file".into()),
    };

    let engine = SynthesisEngine::new()?;
    let runtime = tokio::runtime::Runtime::new()?;
    let audio = runtime.block_on(engine.synthesize(&text, voice))?;

    std::fs::write(output, &audio)?;
    println!("wrote {} bytes to {}", audio.len(), output);

    if play {
        playback::play_file(std::path::Path::new(output))?;
        std::fs::remove_file(output)?;
    }
    Ok(())
}

/// Run the `voices` subcommand.
fn handle_voices() {
    println!("{} voices available:", CATALOG.len());
    for voice in CATALOG {
        println!("  {:<28} {}", voice.name, voice.id);
    }
}

/// Run the `config show` subcommand.
fn handle_config_show(config_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ConfigStore::new(config_dir);
    let config = store.load();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

/// Run the `config path` subcommand.
fn handle_config_path(config_dir: &str) {
    let store = ConfigStore::new(config_dir);
    for path in store.watched_paths() {
        println!("{}", path.display());
    }
}

/// Run the `version` subcommand.
fn handle_version() {
    println!("chatvox {}", env!("CARGO_PKG_VERSION"));
    println!("  Build date: {}", env!("CHATVOX_BUILD_DATE"));
    println!("  Git commit: {}", env!("CHATVOX_GIT_HASH"));
    println!(
        "  Platform:   {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}
