//! Filter rule configuration
//!
//! The mutable rule set lives in a directory of key=value and list-structured
//! text files maintained by an external settings tool. chatvox only reads
//! them (plus mtime polling for hot reload) and writes the priority-voice
//! file when a moderator command mutates it.

pub mod store;
pub mod types;

pub use store::{ConfigStore, MutationOutcome};
pub use types::FilterConfig;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
