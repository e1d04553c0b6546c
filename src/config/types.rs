//! Typed filter rules and the line formats they are parsed from.

use serde::Serialize;
use std::collections::HashMap;

/// Trigger token stripped from comments when the prefix gate is on.
pub const DEFAULT_TRIGGER_TOKEN: &str = "!tts";

/// Voice id used whenever a required role entry is absent.
pub const FALLBACK_VOICE_ID: &str = "en_us_001";

/// Reply used when a bad word is detected and no templates are configured.
pub const DEFAULT_REPLY: &str = "is trying to make me say a bad word";

/// Role map value that explicitly silences a class of user.
pub const SILENCED: &str = "NONE";

pub const ROLE_SUBSCRIBER: &str = "Subscriber";
pub const ROLE_MODERATOR: &str = "Moderator";
pub const ROLE_DEFAULT: &str = "Default";
pub const ROLE_BAD_WORD: &str = "BadWordVoice";

/// Role map key for a top gifter rank (valid ranks are 1..=5).
pub fn top_gifter_key(rank: u32) -> String {
    format!("Top Gifter {}", rank)
}

/// Role map key for a follow role (0 = none, 1 = follower, 2 = friend).
pub fn follow_role_key(role: u8) -> String {
    format!("Follow Role {}", role)
}

/// The complete rule set, replaced wholesale on every reload.
///
/// Readers always hold a fully consistent snapshot; partial updates are
/// impossible because a reload rebuilds the whole value before handing it
/// out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterConfig {
    /// Require comments to start with the trigger token.
    pub tts_prefix_required: bool,
    /// Token checked (and stripped) by the prefix gate.
    pub trigger_token: String,
    /// Case-insensitive substring blocklist, scanned in file order.
    pub word_blocklist: Vec<String>,
    /// Replies substituted for a blocked comment, one chosen at random.
    pub reply_templates: Vec<String>,
    /// Display-name substitutions applied to the spoken name.
    pub name_swaps: HashMap<String, String>,
    /// Per-speaker voice overrides, mutable at runtime via moderator commands.
    pub priority_voices: HashMap<String, String>,
    /// Role key to voice id, always resolvable for `Default` and `BadWordVoice`.
    pub role_voice_map: HashMap<String, String>,
    /// Master switch for moderator voice commands.
    pub voice_change_enabled: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let mut role_voice_map = HashMap::new();
        ensure_role_fallbacks(&mut role_voice_map);
        Self {
            tts_prefix_required: false,
            trigger_token: DEFAULT_TRIGGER_TOKEN.to_string(),
            word_blocklist: Vec::new(),
            reply_templates: Vec::new(),
            name_swaps: HashMap::new(),
            priority_voices: HashMap::new(),
            role_voice_map,
            voice_change_enabled: false,
        }
    }
}

/// Guarantee the role map can always resolve `Default` and `BadWordVoice`.
pub fn ensure_role_fallbacks(map: &mut HashMap<String, String>) {
    for key in [ROLE_DEFAULT, ROLE_BAD_WORD] {
        map.entry(key.to_string())
            .or_insert_with(|| FALLBACK_VOICE_ID.to_string());
    }
}

/// Parse a toggle file. The first `key=value` line decides; the value must
/// be exactly `TRUE`. A file with no `=` is read as a bare flag.
pub fn parse_flag(content: &str) -> bool {
    content
        .lines()
        .find_map(|line| line.split_once('=').map(|(_, value)| value.trim() == "TRUE"))
        .unwrap_or_else(|| content.trim() == "TRUE")
}

/// Parse a list file: one entry per line, blank lines skipped.
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `key=value` map file; lines without `=` are skipped.
pub fn parse_map(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
