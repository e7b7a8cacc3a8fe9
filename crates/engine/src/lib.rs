//! Engine-facing driver around the core game.
//!
//! Frontends never call into [`blockfall_core::GameState`] directly: they push
//! actions and elapsed time into a [`Session`], which applies them one at a
//! time in arrival order.

pub mod session;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use session::{Command, Session};
