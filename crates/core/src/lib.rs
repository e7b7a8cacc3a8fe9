//! Core game logic - pure, deterministic, and testable
//!
//! All game rules, state and simulation live here. Nothing in this crate
//! touches the terminal or the clock: time comes in as elapsed milliseconds,
//! randomness from a seed.
//!
//! # Module Structure
//!
//! - [`catalog`]: the seven tetromino shapes, colors and spawn positions
//! - [`board`]: 10x20 playfield and line clearing
//! - [`collision`]: collision tests, rotation with wall kicks, merging
//! - [`scoring`]: line points, combo bonus, level and gravity curves
//! - [`rng`]: seeded LCG and piece randomizers
//! - [`queue`]: fixed-length preview of upcoming pieces
//! - [`game_state`]: the falling piece, hold, phases and timing
//! - [`particles`]: line-clear particle data for renderers
//! - [`snapshot`]: copyable read-only view of a game
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: each piece is drawn independently (a 7-bag is available)
//! - **Simple kicks**: rotations try shifts of 0, +1, -1, +2, -2 columns
//! - **Hard drop**: the piece lands at once and locks on the next step
//! - **Hold**: one swap per piece
//! - **Scoring**: 100/300/500/800 times (level + 1), plus 50 per combo step
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::GameAction;
//!
//! let mut game = GameState::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//! game.tick(16);
//!
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time. Gravity starts at 1000ms per row and speeds up by 50ms per
//! level, down to 50ms.

pub mod board;
pub mod catalog;
pub mod collision;
pub mod game_state;
pub mod particles;
pub mod queue;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LineClear};
pub use catalog::{tetromino, Position, Shape, Tetromino, TETROMINOS};
pub use collision::{check_collision, merge_tetromino, rotate, try_rotate};
pub use game_state::{GameState, LockEvent, Player};
pub use particles::{ParticleEffect, ParticleField};
pub use queue::NextQueue;
pub use rng::{random_tetromino, PieceSource, Randomizer, SimpleRng};
pub use scoring::{calculate_drop_time, calculate_level, calculate_score};
pub use snapshot::{GameSnapshot, PlayerSnapshot};
