//! Read-only views of a game for renderers
//!
//! A [`GameSnapshot`] is `Copy` and holds the board as piece markers
//! (0 = empty, 1..=7 = [`PieceKind::marker`]), so a frontend can keep one
//! around and refill it with `GameState::snapshot_into` every frame.

use crate::board::MarkerGrid;
use crate::catalog::{Position, Shape};
use crate::game_state::Player;
use crate::types::{GamePhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub pos: Position,
}

impl From<Player> for PlayerSnapshot {
    fn from(value: Player) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            pos: value.pos,
        }
    }
}

impl PlayerSnapshot {
    /// Absolute board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let pos = self.pos;
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (pos.x + dx, pos.y + dy))
    }
}

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Marker grid (`0` = empty, [`PieceKind::marker`] otherwise)
    pub board: MarkerGrid,
    pub player: PlayerSnapshot,
    pub ghost_y: i8,
    pub held: Option<PieceKind>,
    pub next: [PieceKind; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub drop_time_ms: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Board markers with the falling piece drawn in.
    ///
    /// Cells of the piece above the top edge are not shown.
    pub fn display_grid(&self) -> MarkerGrid {
        let mut grid = self.board;
        let marker = self.player.kind.marker();
        for (x, y) in self.player.cells() {
            if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                grid[y as usize][x as usize] = marker;
            }
        }
        grid
    }

    /// Falling piece cells at the ghost row
    pub fn ghost_cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let ghost = PlayerSnapshot {
            pos: Position::new(self.player.pos.x, self.ghost_y),
            ..self.player
        };
        ghost.cells()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            player: PlayerSnapshot::from(Player::spawn(PieceKind::I)),
            ghost_y: 0,
            held: None,
            next: [PieceKind::I; NEXT_QUEUE_LEN],
            can_hold: true,
            phase: GamePhase::Running,
            score: 0,
            level: 0,
            lines: 0,
            combo: 0,
            drop_time_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = GameState::new(9);
        let snap = state.snapshot();

        assert_eq!(snap.player.kind, state.player().kind);
        assert_eq!(snap.player.pos, state.player().pos);
        assert_eq!(&snap.next, state.next_pieces());
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.drop_time_ms, 1000);
        assert!(snap.playable());
    }

    #[test]
    fn test_display_grid_projects_player() {
        let state = GameState::new(9);
        let snap = state.snapshot();
        let grid = snap.display_grid();

        let marker = state.player().kind.marker();
        let drawn = grid.iter().flatten().filter(|&&m| m == marker).count();
        assert_eq!(drawn, 4);
        // The board view itself is untouched.
        assert!(snap.board.iter().flatten().all(|&m| m == 0));
    }

    #[test]
    fn test_ghost_cells_sit_on_floor() {
        let snap = GameState::new(9).snapshot();
        let lowest = snap.ghost_cells().map(|(_, y)| y).max();
        assert_eq!(lowest, Some(BOARD_HEIGHT as i8 - 1));
    }
}
