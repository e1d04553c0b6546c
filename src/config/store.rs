//! Rule file loading, mtime-polled hot reload, and priority-voice mutation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::types::{self, FilterConfig};
use super::Result;

pub const TTS_PREFIX_FILE: &str = "A_ttscode.txt";
pub const WORD_FILTER_FILE: &str = "B_word_filter.txt";
pub const FILTER_REPLY_FILE: &str = "B_filter_reply.txt";
pub const PRIORITY_VOICE_FILE: &str = "C_priority_voice.txt";
pub const VOICE_MAP_FILE: &str = "D_voice_map.txt";
pub const NAME_SWAP_FILE: &str = "E_name_swap.txt";
pub const VOICE_CHANGE_FILE: &str = "Voice_change.txt";

const WATCHED_FILES: &[&str] = &[
    TTS_PREFIX_FILE,
    WORD_FILTER_FILE,
    FILTER_REPLY_FILE,
    PRIORITY_VOICE_FILE,
    VOICE_MAP_FILE,
    NAME_SWAP_FILE,
    VOICE_CHANGE_FILE,
];

/// Result of a priority-voice mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Added,
    AlreadyExists,
    Changed,
    Removed,
    NotFound,
}

impl std::fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::AlreadyExists => write!(f, "already exists"),
            Self::Changed => write!(f, "changed"),
            Self::Removed => write!(f, "removed"),
            Self::NotFound => write!(f, "not found"),
        }
    }
}

/// Owns the rule files and the mtimes last seen for each.
///
/// Reload is atomic: any changed mtime triggers a full re-read of every
/// file, so a returned [`FilterConfig`] is never assembled from a mix of
/// old and new files.
#[derive(Debug)]
pub struct ConfigStore {
    dir: PathBuf,
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mtimes: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute paths of every watched rule file.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        WATCHED_FILES.iter().map(|name| self.dir.join(name)).collect()
    }

    /// Load every rule file into a fresh [`FilterConfig`].
    ///
    /// A missing or unreadable file is logged loudly and its section falls
    /// back to defaults; startup is never blocked on an incomplete rule
    /// directory.
    pub fn load(&mut self) -> FilterConfig {
        let mut config = FilterConfig {
            tts_prefix_required: self
                .read_section(TTS_PREFIX_FILE)
                .map(|content| types::parse_flag(&content))
                .unwrap_or(false),
            word_blocklist: self
                .read_section(WORD_FILTER_FILE)
                .map(|content| types::parse_list(&content))
                .unwrap_or_default(),
            reply_templates: self
                .read_section(FILTER_REPLY_FILE)
                .map(|content| types::parse_list(&content))
                .unwrap_or_default(),
            priority_voices: self
                .read_section(PRIORITY_VOICE_FILE)
                .map(|content| types::parse_map(&content))
                .unwrap_or_default(),
            role_voice_map: self
                .read_section(VOICE_MAP_FILE)
                .map(|content| types::parse_map(&content))
                .unwrap_or_default(),
            name_swaps: self
                .read_section(NAME_SWAP_FILE)
                .map(|content| types::parse_map(&content))
                .unwrap_or_default(),
            voice_change_enabled: self
                .read_section(VOICE_CHANGE_FILE)
                .map(|content| types::parse_flag(&content))
                .unwrap_or(false),
            ..FilterConfig::default()
        };
        types::ensure_role_fallbacks(&mut config.role_voice_map);
        self.record_mtimes();
        config
    }

    /// Reload all files if any watched file's mtime changed since the last
    /// check. Returns `None` when nothing changed.
    pub fn check_and_reload(&mut self) -> Option<FilterConfig> {
        let mut updated = false;
        for path in self.watched_paths() {
            let Ok(modified) = fs::metadata(&path).and_then(|meta| meta.modified()) else {
                continue;
            };
            if self.mtimes.get(&path) != Some(&modified) {
                updated = true;
            }
        }

        if updated {
            tracing::info!("rule files updated, reloading filters");
            Some(self.load())
        } else {
            None
        }
    }

    /// Add a priority-voice entry; reports when the exact pair already exists.
    pub fn add_priority_voice(&self, name: &str, voice: &str) -> Result<MutationOutcome> {
        let mut lines = self.read_priority_lines();
        let entry = format!("{}={}", name, voice);
        if lines.contains(&entry) {
            return Ok(MutationOutcome::AlreadyExists);
        }
        lines.push(entry);
        self.write_priority_lines(&lines)?;
        Ok(MutationOutcome::Added)
    }

    /// Replace an existing priority-voice entry; never creates one.
    pub fn change_priority_voice(&self, name: &str, voice: &str) -> Result<MutationOutcome> {
        let mut lines = self.read_priority_lines();
        let prefix = format!("{}=", name);
        let Some(line) = lines.iter_mut().find(|line| line.starts_with(&prefix)) else {
            return Ok(MutationOutcome::NotFound);
        };
        *line = format!("{}={}", name, voice);
        self.write_priority_lines(&lines)?;
        Ok(MutationOutcome::Changed)
    }

    /// Remove the priority-voice entry for `name`.
    pub fn remove_priority_voice(&self, name: &str) -> Result<MutationOutcome> {
        let lines = self.read_priority_lines();
        let prefix = format!("{}=", name);
        let kept: Vec<String> = lines
            .iter()
            .filter(|line| !line.starts_with(&prefix))
            .cloned()
            .collect();
        if kept.len() == lines.len() {
            return Ok(MutationOutcome::NotFound);
        }
        self.write_priority_lines(&kept)?;
        Ok(MutationOutcome::Removed)
    }

    fn read_section(&self, name: &str) -> Option<String> {
        let path = self.dir.join(name);
        match fs::read(&path) {
            Ok(bytes) => Some(decode_text(bytes)),
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "rule file unreadable, using defaults");
                None
            }
        }
    }

    fn read_priority_lines(&self) -> Vec<String> {
        self.read_section(PRIORITY_VOICE_FILE)
            .map(|content| types::parse_list(&content))
            .unwrap_or_default()
    }

    fn write_priority_lines(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(self.dir.join(PRIORITY_VOICE_FILE), content)?;
        Ok(())
    }

    fn record_mtimes(&mut self) {
        for path in self.watched_paths() {
            if let Ok(modified) = fs::metadata(&path).and_then(|meta| meta.modified()) {
                self.mtimes.insert(path, modified);
            }
        }
    }
}

/// Decode file bytes as UTF-8, falling back to latin-1 for legacy files.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{ROLE_BAD_WORD, ROLE_DEFAULT};
    use std::time::Duration;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join(TTS_PREFIX_FILE), "Enabled=TRUE\n").unwrap();
        fs::write(dir.join(WORD_FILTER_FILE), "badword\n").unwrap();
        fs::write(dir.join(FILTER_REPLY_FILE), "tried something naughty\n").unwrap();
        fs::write(dir.join(PRIORITY_VOICE_FILE), "Alice=en_us_002\n").unwrap();
        fs::write(
            dir.join(VOICE_MAP_FILE),
            "Subscriber=en_us_006\nDefault=en_us_001\nBadWordVoice=en_male_pirate\n",
        )
        .unwrap();
        fs::write(dir.join(NAME_SWAP_FILE), "Alice=Wonderland\n").unwrap();
        fs::write(dir.join(VOICE_CHANGE_FILE), "Enabled=TRUE\n").unwrap();
    }

    #[test]
    fn test_load_parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let mut store = ConfigStore::new(dir.path());
        let config = store.load();

        assert!(config.tts_prefix_required);
        assert!(config.voice_change_enabled);
        assert_eq!(config.word_blocklist, vec!["badword".to_string()]);
        assert_eq!(config.priority_voices.get("Alice"), Some(&"en_us_002".to_string()));
        assert_eq!(config.name_swaps.get("Alice"), Some(&"Wonderland".to_string()));
        assert_eq!(
            config.role_voice_map.get(ROLE_BAD_WORD),
            Some(&"en_male_pirate".to_string())
        );
    }

    #[test]
    fn test_load_with_missing_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::new(dir.path());
        let config = store.load();

        assert!(!config.tts_prefix_required);
        assert!(config.word_blocklist.is_empty());
        // the role map must still resolve its required entries
        assert!(config.role_voice_map.contains_key(ROLE_DEFAULT));
        assert!(config.role_voice_map.contains_key(ROLE_BAD_WORD));
    }

    #[test]
    fn test_check_and_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let mut store = ConfigStore::new(dir.path());
        let _ = store.load();
        assert!(store.check_and_reload().is_none());

        std::thread::sleep(Duration::from_millis(20));
        fs::write(dir.path().join(WORD_FILTER_FILE), "badword\nworseword\n").unwrap();

        let reloaded = store.check_and_reload().expect("change not detected");
        assert_eq!(reloaded.word_blocklist.len(), 2);
        assert!(store.check_and_reload().is_none());
    }

    #[test]
    fn test_priority_voice_mutations() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let store = ConfigStore::new(dir.path());

        assert_eq!(
            store.add_priority_voice("Bob", "en_us_007").unwrap(),
            MutationOutcome::Added
        );
        assert_eq!(
            store.add_priority_voice("Bob", "en_us_007").unwrap(),
            MutationOutcome::AlreadyExists
        );
        assert_eq!(
            store.change_priority_voice("Bob", "en_us_009").unwrap(),
            MutationOutcome::Changed
        );
        assert_eq!(
            store.change_priority_voice("Nobody", "en_us_009").unwrap(),
            MutationOutcome::NotFound
        );
        assert_eq!(
            store.remove_priority_voice("Bob").unwrap(),
            MutationOutcome::Removed
        );
        assert_eq!(
            store.remove_priority_voice("Bob").unwrap(),
            MutationOutcome::NotFound
        );
    }

    #[test]
    fn test_mutation_is_visible_to_next_reload() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());

        let mut store = ConfigStore::new(dir.path());
        let _ = store.load();

        std::thread::sleep(Duration::from_millis(20));
        store.add_priority_voice("Bob", "en_us_007").unwrap();

        let reloaded = store.check_and_reload().expect("mutation not detected");
        assert_eq!(reloaded.priority_voices.get("Bob"), Some(&"en_us_007".to_string()));
    }

    #[test]
    fn test_decode_text_latin1_fallback() {
        assert_eq!(decode_text(vec![0x63, 0x61, 0x66, 0xe9]), "café");
    }
}
