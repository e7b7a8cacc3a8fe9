//! Session - serializes every transition through one command queue.
//!
//! Key presses and timer ticks may arrive in any interleaving; each is queued
//! and applied as one complete transition before the next one starts.

use std::collections::VecDeque;

use log::debug;

use crate::core::{GameSnapshot, GameState, ParticleEffect, ParticleField, Randomizer};
use crate::types::GameAction;

/// Salt so particle jitter does not mirror the piece sequence.
const PARTICLE_SEED_SALT: u32 = 0x9E37_79B9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Action(GameAction),
    /// Elapsed milliseconds since the previous tick
    Tick(u32),
}

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    particles: ParticleField,
    queue: VecDeque<Command>,
}

impl Session {
    pub fn new(seed: u32) -> Self {
        Self::with_randomizer(seed, Randomizer::Uniform)
    }

    pub fn with_randomizer(seed: u32, randomizer: Randomizer) -> Self {
        Self::from_state(GameState::with_randomizer(seed, randomizer), seed)
    }

    pub fn from_state(state: GameState, seed: u32) -> Self {
        Self {
            state,
            particles: ParticleField::new(seed ^ PARTICLE_SEED_SALT),
            queue: VecDeque::new(),
        }
    }

    /// Queue an action; it runs on the next [`Session::advance`] or [`Session::drain`].
    pub fn push(&mut self, action: GameAction) {
        self.queue.push_back(Command::Action(action));
    }

    /// Queue a tick behind any pending actions and run everything queued.
    ///
    /// Returns whether the game state changed.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        self.queue.push_back(Command::Tick(elapsed_ms));
        self.drain()
    }

    /// Run every queued command in arrival order.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Some(command) = self.queue.pop_front() {
            changed |= self.apply(command);
        }
        changed
    }

    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Action(GameAction::Restart) => {
                self.state.restart();
                self.particles.clear();
                true
            }
            Command::Action(action) => {
                let changed = self.state.apply_action(action);
                self.collect_event();
                changed
            }
            Command::Tick(elapsed_ms) => {
                let changed = self.state.tick(elapsed_ms);
                self.collect_event();
                if !self.state.is_paused() {
                    self.particles.update(elapsed_ms);
                }
                changed
            }
        }
    }

    fn collect_event(&mut self) {
        let Some(event) = self.state.take_last_event() else {
            return;
        };
        if event.lines_cleared > 0 {
            debug!(
                "{} line(s) cleared at rows {:?}",
                event.lines_cleared,
                event.rows.as_slice()
            );
            self.particles.spawn_line_clear(&event);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn particles(&self) -> &[ParticleEffect] {
        self.particles.particles()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Commands waiting to run
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Player, PlayerSnapshot};
    use crate::types::{GamePhase, PieceKind, BOARD_WIDTH};

    /// Rows 18 and 19 full except columns 4 and 5, the O spawn columns.
    fn two_row_well() -> Board {
        let mut board = Board::new();
        for y in 18..20 {
            for x in 0..BOARD_WIDTH as i8 {
                if x != 4 && x != 5 {
                    board.set(x, y, Some(PieceKind::L));
                }
            }
        }
        board
    }

    /// Seed whose first piece is an O.
    fn seed_with_o() -> u32 {
        (1..10_000)
            .find(|&seed| GameState::new(seed).player().kind == PieceKind::O)
            .unwrap()
    }

    #[test]
    fn test_actions_wait_for_drain() {
        let mut session = Session::new(1);
        let x = session.state().player().pos.x;

        session.push(GameAction::MoveLeft);
        session.push(GameAction::MoveLeft);
        assert_eq!(session.pending(), 2);
        assert_eq!(session.state().player().pos.x, x);

        assert!(session.drain());
        assert_eq!(session.pending(), 0);
        assert_eq!(session.state().player().pos.x, x - 2);
    }

    #[test]
    fn test_commands_run_in_arrival_order() {
        let mut session = Session::new(1);
        session.push(GameAction::TogglePause);
        session.push(GameAction::MoveLeft);
        session.push(GameAction::TogglePause);
        session.push(GameAction::MoveRight);
        session.drain();

        // The left move was swallowed by the pause, the right one was not.
        let spawn_x = Session::new(1).state().player().pos.x;
        assert_eq!(session.state().player().pos.x, spawn_x + 1);
        assert_eq!(session.state().phase(), GamePhase::Running);
    }

    #[test]
    fn test_advance_ticks_after_queued_actions() {
        let mut session = Session::new(1);
        session.push(GameAction::HardDrop);
        session.advance(0);

        // Hard drop landed, the tick flushed the lock.
        assert_eq!(session.state().board().filled_count(), 4);
        assert!(!session.state().lock_pending());
    }

    #[test]
    fn test_line_clear_spawns_particles() {
        let seed = seed_with_o();
        let state = GameState::with_board(seed, two_row_well());
        assert_eq!(state.player().kind, PieceKind::O);
        let mut session = Session::from_state(state, seed);

        session.push(GameAction::HardDrop);
        session.advance(0);

        assert_eq!(session.state().lines(), 2);
        assert!(!session.particles().is_empty());
    }

    #[test]
    fn test_particles_freeze_while_paused() {
        let seed = seed_with_o();
        let mut session = Session::from_state(GameState::with_board(seed, two_row_well()), seed);
        session.push(GameAction::HardDrop);
        session.advance(0);
        session.push(GameAction::TogglePause);
        session.drain();

        let before = session.particles().to_vec();
        session.advance(5_000);
        assert_eq!(session.particles(), before.as_slice());
    }

    #[test]
    fn test_restart_clears_particles() {
        let seed = seed_with_o();
        let mut session = Session::from_state(GameState::with_board(seed, two_row_well()), seed);
        session.push(GameAction::HardDrop);
        session.advance(0);
        assert!(!session.particles().is_empty());

        session.push(GameAction::Restart);
        session.drain();

        assert!(session.particles().is_empty());
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().board().filled_count(), 0);
    }

    #[test]
    fn test_snapshot_matches_state() {
        let mut session = Session::new(3);
        session.push(GameAction::Hold);
        session.drain();

        let snap = session.snapshot();
        assert_eq!(snap.held, session.state().held());
        assert!(!snap.can_hold);
        assert_eq!(
            snap.player,
            PlayerSnapshot::from(Player::spawn(session.state().player().kind))
        );
    }
}
