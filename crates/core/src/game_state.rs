//! Game state module - the aggregate root of a game
//!
//! Ties the board, the falling piece, the next queue and the hold slot to the
//! scoring rules and the gravity timer. Every public operation is one complete
//! transition: it either commits a consistent new state or leaves the state
//! untouched.
//!
//! Timing is driven by [`GameState::tick`] with elapsed milliseconds. Elapsed
//! time only accumulates while running, so a pause never produces a burst of
//! drops on resume.

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::board::{Board, Row};
use crate::catalog::{spawn_position, tetromino, Position, Shape};
use crate::collision::{check_collision, landing_offset, merge_tetromino, try_rotate};
use crate::queue::NextQueue;
use crate::rng::{PieceSource, Randomizer};
use crate::scoring::{calculate_drop_time, calculate_level, calculate_score};
use crate::snapshot::{GameSnapshot, PlayerSnapshot};
use crate::types::*;

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player {
    pub kind: PieceKind,
    /// Current orientation of the catalog shape
    pub shape: Shape,
    pub pos: Position,
    /// Cleared by a hold, restored when a piece locks
    pub can_hold: bool,
}

impl Player {
    /// Fresh piece at its spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = tetromino(kind).shape;
        Self {
            kind,
            shape,
            pos: spawn_position(&shape),
            can_hold: true,
        }
    }

    /// Absolute board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let pos = self.pos;
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (pos.x + dx, pos.y + dy))
    }

    pub fn color(&self) -> Rgb {
        tetromino(self.kind).color
    }
}

/// What happened when a piece settled.
///
/// Consumed by observers (particles, sound, logs) via [`GameState::take_last_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Original indices of cleared rows, top to bottom
    pub rows: ArrayVec<usize, { BOARD_HEIGHT as usize }>,
    /// Contents of the cleared rows right before removal
    pub row_cells: ArrayVec<Row, { BOARD_HEIGHT as usize }>,
    pub score_delta: u32,
    /// Combo counter after this lock
    pub combo: u32,
    pub level_up: bool,
    pub game_over: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    player: Player,
    next: NextQueue,
    held: Option<PieceKind>,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    phase: GamePhase,
    /// Gravity interval for the current level
    drop_time_ms: u32,
    /// Running time accumulated since the last gravity step
    since_drop_ms: u32,
    /// Set by a hard drop; the lock runs at the start of the next transition.
    lock_pending: bool,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed and uniform piece selection
    pub fn new(seed: u32) -> Self {
        Self::with_randomizer(seed, Randomizer::Uniform)
    }

    pub fn with_randomizer(seed: u32, randomizer: Randomizer) -> Self {
        Self::build(Board::new(), PieceSource::new(seed, randomizer))
    }

    /// Start on a prepared board (puzzles, tests, benches).
    pub fn with_board(seed: u32, board: Board) -> Self {
        Self::build(board, PieceSource::new(seed, Randomizer::Uniform))
    }

    fn build(board: Board, source: PieceSource) -> Self {
        let mut next = NextQueue::new(source);
        let player = Player::spawn(next.pop_front());

        let mut state = Self {
            board,
            player,
            next,
            held: None,
            score: 0,
            level: 0,
            lines: 0,
            combo: 0,
            phase: GamePhase::Running,
            drop_time_ms: calculate_drop_time(0),
            since_drop_ms: 0,
            lock_pending: false,
            last_event: None,
        };
        if check_collision(&state.player, &state.board, 0, 0) {
            state.end_game();
        }
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn next_pieces(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        self.next.pieces()
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.player.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn drop_time_ms(&self) -> u32 {
        self.drop_time_ms
    }

    pub fn since_drop_ms(&self) -> u32 {
        self.since_drop_ms
    }

    pub fn lock_pending(&self) -> bool {
        self.lock_pending
    }

    pub fn randomizer(&self) -> Randomizer {
        self.next.randomizer()
    }

    pub fn last_event(&self) -> Option<&LockEvent> {
        self.last_event.as_ref()
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Row the falling piece would land on
    pub fn ghost_y(&self) -> i8 {
        self.player.pos.y + landing_offset(&self.player, &self.board)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot (no allocation).
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_markers(&mut out.board);
        out.player = PlayerSnapshot::from(self.player);
        out.ghost_y = self.ghost_y();
        out.held = self.held;
        out.next = *self.next.pieces();
        out.can_hold = self.player.can_hold;
        out.phase = self.phase;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.drop_time_ms = self.drop_time_ms;
    }

    /// Apply a named action. Returns whether anything changed.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::Rotate => self.rotate(1),
            GameAction::RotateCcw => self.rotate(-1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Hold => self.hold(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i8) -> bool {
        let flushed = self.flush_pending_lock();
        if !self.is_running() || check_collision(&self.player, &self.board, dx, 0) {
            return flushed;
        }
        self.player.pos.x += dx;
        true
    }

    /// Rotate clockwise (`direction > 0`) or counter-clockwise, with wall kicks.
    ///
    /// A rotation that fits nowhere is silently dropped.
    pub fn rotate(&mut self, direction: i8) -> bool {
        let flushed = self.flush_pending_lock();
        if !self.is_running() {
            return flushed;
        }
        match try_rotate(&self.player, &self.board, direction) {
            Some(rotated) => {
                self.player = rotated;
                true
            }
            None => flushed,
        }
    }

    /// One gravity step on demand.
    pub fn soft_drop(&mut self) -> bool {
        let flushed = self.flush_pending_lock();
        if !self.is_running() {
            return flushed;
        }
        self.step_down();
        true
    }

    /// Move the piece to its landing row. The lock follows on the next transition.
    pub fn hard_drop(&mut self) -> bool {
        let flushed = self.flush_pending_lock();
        if !self.is_running() {
            return flushed;
        }
        self.player.pos.y += landing_offset(&self.player, &self.board);
        self.lock_pending = true;
        true
    }

    /// Swap the falling piece with the held one (or stash it and take the next).
    pub fn hold(&mut self) -> bool {
        let flushed = self.flush_pending_lock();
        if !self.is_running() || !self.player.can_hold {
            return flushed;
        }

        let current = self.player.kind;
        let incoming = match self.held.replace(current) {
            Some(kind) => kind,
            None => self.next.pop_front(),
        };
        debug!("hold: {:?} -> slot, {:?} in play", current, incoming);

        self.player = Player {
            can_hold: false,
            ..Player::spawn(incoming)
        };
        if check_collision(&self.player, &self.board, 0, 0) {
            self.end_game();
        }
        true
    }

    /// Pause or resume. Ignored after game over.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::GameOver => false,
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                debug!("resumed");
                true
            }
            GamePhase::Running => {
                self.flush_pending_lock();
                if self.phase == GamePhase::Running {
                    self.phase = GamePhase::Paused;
                    debug!("paused");
                }
                true
            }
        }
    }

    /// Replace the whole state with a fresh game.
    ///
    /// The new queue is seeded from the current RNG state, so the next game is a
    /// new random sequence while remaining reproducible from the first seed.
    pub fn restart(&mut self) {
        let seed = self.next.next_seed();
        let randomizer = self.next.randomizer();
        info!("restart (final score {}, lines {})", self.score, self.lines);
        *self = Self::with_randomizer(seed, randomizer);
    }

    /// Advance the gravity timer by `elapsed_ms`.
    ///
    /// One row falls per full `drop_time_ms` of running time; the remainder
    /// carries over to the next tick. Returns whether the state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = self.flush_pending_lock();
        if !self.is_running() {
            return changed;
        }

        self.since_drop_ms = self.since_drop_ms.saturating_add(elapsed_ms);
        while self.is_running() && self.since_drop_ms >= self.drop_time_ms {
            self.since_drop_ms -= self.drop_time_ms;
            self.step_down();
            changed = true;
        }
        if !self.is_running() {
            self.since_drop_ms = 0;
        }
        changed
    }

    fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Run a lock deferred by a hard drop. Returns whether one ran.
    fn flush_pending_lock(&mut self) -> bool {
        if !self.lock_pending {
            return false;
        }
        self.lock_pending = false;
        self.settle();
        true
    }

    /// Move down one row, or settle the piece if it is blocked.
    fn step_down(&mut self) {
        if check_collision(&self.player, &self.board, 0, 1) {
            self.settle();
        } else {
            self.player.pos.y += 1;
        }
    }

    /// The piece can't fall any further.
    fn settle(&mut self) {
        if self.player.pos.y < 1 {
            self.top_out();
        } else {
            self.lock_player();
        }
    }

    /// Blocked while still in the top row: write the piece and end the game.
    fn top_out(&mut self) {
        self.board = merge_tetromino(&self.board, &self.player);
        self.end_game();
        self.last_event = Some(LockEvent {
            kind: self.player.kind,
            lines_cleared: 0,
            rows: ArrayVec::new(),
            row_cells: ArrayVec::new(),
            score_delta: 0,
            combo: self.combo,
            level_up: false,
            game_over: true,
        });
    }

    /// Merge, clear, score, then bring in the next piece.
    fn lock_player(&mut self) {
        let kind = self.player.kind;
        let merged = merge_tetromino(&self.board, &self.player);
        let clear = merged.clear_lines();
        let cleared = clear.count();
        let row_cells = clear.rows.iter().map(|&y| *merged.row(y)).collect();

        // The combo is updated first; the score uses the new value.
        self.combo = if cleared > 0 { self.combo + 1 } else { 0 };
        let score_delta = calculate_score(self.level, cleared, self.combo);
        self.score = self.score.saturating_add(score_delta);
        self.lines = self.lines.saturating_add(cleared as u32);

        let level = calculate_level(self.lines);
        let level_up = level != self.level;
        if level_up {
            info!("level {} -> {}", self.level, level);
        }
        self.level = level;
        self.drop_time_ms = calculate_drop_time(level);

        debug!(
            "lock {:?} at ({}, {}): {} lines, +{} points, combo {}",
            kind, self.player.pos.x, self.player.pos.y, cleared, score_delta, self.combo
        );

        self.board = clear.board;
        self.player = Player::spawn(self.next.pop_front());
        if check_collision(&self.player, &self.board, 0, 0) {
            self.end_game();
        }

        self.last_event = Some(LockEvent {
            kind,
            lines_cleared: cleared as u32,
            rows: clear.rows,
            row_cells,
            score_delta,
            combo: self.combo,
            level_up,
            game_over: self.is_game_over(),
        });
    }

    fn end_game(&mut self) {
        self.phase = GamePhase::GameOver;
        self.lock_pending = false;
        info!(
            "game over: score {}, level {}, lines {}",
            self.score, self.level, self.lines
        );
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_player(&mut self, player: Player) {
        self.player = player;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
