//! chatvox library
//!
//! Core functionality for the chatvox narrator: the chat filter pipeline,
//! voice resolution, moderator commands, and the multi-endpoint speech
//! synthesis engine.

pub mod cli;
pub mod commands;
pub mod config;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod stream;
pub mod tts;
