//! Moderator voice commands
//!
//! Chat-borne administrative commands that mutate the priority-voice table:
//! `!vadd NAME VOICE`, `!vremove NAME`, `!vchange NAME VOICE`. Commands are
//! whitespace-tokenized and must have exactly the right argument count; a
//! mistyped command is not a command at all and falls through to normal
//! filtering.

use crate::config::{ConfigStore, MutationOutcome, Result};

/// A recognized priority-voice mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    /// `!vadd NAME VOICE`
    Add { name: String, voice: String },
    /// `!vchange NAME VOICE`
    Change { name: String, voice: String },
    /// `!vremove NAME`
    Remove { name: String },
}

impl VoiceCommand {
    /// Parse a chat comment as a voice command, or `None` if it is not one.
    pub fn parse(comment: &str) -> Option<Self> {
        let tokens: Vec<&str> = comment.split_whitespace().collect();
        match tokens.as_slice() {
            ["!vadd", name, voice] => Some(Self::Add {
                name: (*name).to_string(),
                voice: (*voice).to_string(),
            }),
            ["!vchange", name, voice] => Some(Self::Change {
                name: (*name).to_string(),
                voice: (*voice).to_string(),
            }),
            ["!vremove", name] => Some(Self::Remove {
                name: (*name).to_string(),
            }),
            _ => None,
        }
    }
}

/// Apply a voice command through the store's mutation contract.
///
/// The change is persisted to the priority-voice file, so it is visible to
/// the next reload check.
pub fn dispatch(store: &ConfigStore, command: &VoiceCommand) -> Result<MutationOutcome> {
    let outcome = match command {
        VoiceCommand::Add { name, voice } => store.add_priority_voice(name, voice)?,
        VoiceCommand::Change { name, voice } => store.change_priority_voice(name, voice)?,
        VoiceCommand::Remove { name } => store.remove_priority_voice(name)?,
    };
    tracing::info!(command = ?command, outcome = %outcome, "voice command dispatched");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        assert_eq!(
            VoiceCommand::parse("!vadd Alice en_us_002"),
            Some(VoiceCommand::Add {
                name: "Alice".to_string(),
                voice: "en_us_002".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_change_and_remove() {
        assert_eq!(
            VoiceCommand::parse("!vchange Alice GHOSTFACE"),
            Some(VoiceCommand::Change {
                name: "Alice".to_string(),
                voice: "GHOSTFACE".to_string(),
            })
        );
        assert_eq!(
            VoiceCommand::parse("!vremove Alice"),
            Some(VoiceCommand::Remove {
                name: "Alice".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        assert_eq!(
            VoiceCommand::parse("  !vremove   Alice  "),
            Some(VoiceCommand::Remove {
                name: "Alice".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_argument_counts_are_not_commands() {
        assert_eq!(VoiceCommand::parse("!vadd Alice"), None);
        assert_eq!(VoiceCommand::parse("!vadd Alice en_us_002 extra"), None);
        assert_eq!(VoiceCommand::parse("!vremove"), None);
        assert_eq!(VoiceCommand::parse("!vremove Alice Bob"), None);
        assert_eq!(VoiceCommand::parse("!vchange Alice"), None);
    }

    #[test]
    fn test_non_commands_are_ignored() {
        assert_eq!(VoiceCommand::parse("hello chat"), None);
        assert_eq!(VoiceCommand::parse("!vaddx Alice en_us_002"), None);
        assert_eq!(VoiceCommand::parse(""), None);
    }
}
