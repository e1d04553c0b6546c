//! Chat filtering and voice resolution.

pub mod resolver;

pub use resolver::{resolve, DropReason, Resolution};
