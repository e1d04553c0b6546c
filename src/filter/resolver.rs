//! Voice resolution
//!
//! Pure decision function mapping a chat event plus a rule snapshot to a
//! speak/command/drop outcome. Precedence is fixed, evaluated top to bottom,
//! first decisive branch wins:
//!
//! 1. name swap (spoken name only; priority-voice lookup keeps the original)
//! 2. moderator command interception
//! 3. trigger-prefix gate
//! 4. blocklist substitution
//! 5. priority voice
//! 6. role voice map, then default

use rand::seq::SliceRandom;

use crate::commands::VoiceCommand;
use crate::config::types::{
    follow_role_key, top_gifter_key, DEFAULT_REPLY, FALLBACK_VOICE_ID, ROLE_BAD_WORD,
    ROLE_DEFAULT, ROLE_MODERATOR, ROLE_SUBSCRIBER, SILENCED,
};
use crate::config::FilterConfig;
use crate::stream::ChatEvent;

/// Outcome of resolving one chat event.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Vocalize `text` with `voice_id`, attributed to `speaker_name`.
    Speak {
        text: String,
        voice_id: String,
        speaker_name: String,
    },
    /// A recognized moderator command; never vocalized.
    Command(VoiceCommand),
    /// The event is not vocalized.
    Drop(DropReason),
}

/// Why an event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The prefix gate is on and the comment lacks the trigger token.
    MissingPrefix,
    /// The resolved voice is the literal `NONE`, silencing this speaker.
    SilencedRole,
}

impl Resolution {
    pub fn should_speak(&self) -> bool {
        matches!(self, Self::Speak { .. })
    }
}

/// Resolve one event against a rule snapshot.
pub fn resolve(event: &ChatEvent, config: &FilterConfig) -> Resolution {
    // 1. Name swap: affects the spoken name only. Priority-voice lookup
    // stays keyed on the original identity.
    let speaker_name = config
        .name_swaps
        .get(&event.display_name)
        .cloned()
        .unwrap_or_else(|| event.display_name.clone());

    // 2. Command interception, moderators only.
    if config.voice_change_enabled && event.is_moderator {
        if let Some(command) = VoiceCommand::parse(&event.comment) {
            return Resolution::Command(command);
        }
    }

    // 3. Prefix gate.
    let mut comment = event.comment.as_str();
    if config.tts_prefix_required {
        match comment.strip_prefix(config.trigger_token.as_str()) {
            Some(rest) => comment = rest.trim_start(),
            None => return Resolution::Drop(DropReason::MissingPrefix),
        }
    }

    // 4. Blocklist, scanned in file order; any one match suffices.
    let lowered = comment.to_lowercase();
    for word in &config.word_blocklist {
        if lowered.contains(&word.to_lowercase()) {
            tracing::debug!(speaker = %speaker_name, "blocked word, substituting reply");
            return Resolution::Speak {
                text: format!(", {}", random_reply(&config.reply_templates)),
                voice_id: role_entry(config, ROLE_BAD_WORD),
                speaker_name,
            };
        }
    }

    // 5. Priority voice preempts role resolution entirely.
    let voice_id = match config.priority_voices.get(&event.display_name) {
        Some(voice) => voice.clone(),
        None => role_voice(event, config),
    };

    // A value of the literal `NONE` silences the speaker even though a rule
    // matched.
    if voice_id == SILENCED {
        return Resolution::Drop(DropReason::SilencedRole);
    }

    Resolution::Speak {
        text: comment.to_string(),
        voice_id,
        speaker_name,
    }
}

/// Role map resolution in fixed order: subscriber, moderator, top gifter,
/// follow role, default. First hit wins.
fn role_voice(event: &ChatEvent, config: &FilterConfig) -> String {
    let map = &config.role_voice_map;

    if event.is_subscriber {
        if let Some(voice) = map.get(ROLE_SUBSCRIBER) {
            return voice.clone();
        }
    }
    if event.is_moderator {
        if let Some(voice) = map.get(ROLE_MODERATOR) {
            return voice.clone();
        }
    }
    if let Some(rank) = event.top_gifter_rank {
        if (1..=5).contains(&rank) {
            if let Some(voice) = map.get(&top_gifter_key(rank)) {
                return voice.clone();
            }
        }
    }
    if let Some(voice) = map.get(&follow_role_key(event.follow_role)) {
        return voice.clone();
    }

    role_entry(config, ROLE_DEFAULT)
}

fn role_entry(config: &FilterConfig, key: &str) -> String {
    config
        .role_voice_map
        .get(key)
        .cloned()
        .unwrap_or_else(|| FALLBACK_VOICE_ID.to_string())
}

fn random_reply(templates: &[String]) -> String {
    templates
        .choose(&mut rand::thread_rng())
        .cloned()
        .unwrap_or_else(|| DEFAULT_REPLY.to_string())
}
