//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework: maps `crossterm` key events into
//! [`crate::types::GameAction`]. Quitting is not a game action and is reported
//! separately by [`should_quit`].

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
