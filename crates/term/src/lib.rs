//! Terminal game renderer.
//!
//! Renders into a plain framebuffer (no widget toolkit) which is then flushed
//! to the terminal with crossterm, writing only the cells that changed.
//!
//! Board cells are drawn 2 columns wide by default to compensate for the
//! glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
