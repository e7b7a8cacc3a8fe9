//! Collision testing, matrix rotation with wall kicks, and board merging.
//!
//! Everything here is pure: candidates are tested before being committed and
//! the board passed in is never modified.

use crate::board::Board;
use crate::catalog::{Position, Shape};
use crate::game_state::Player;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Offsets tried, in order, after a rotation. The first one that fits wins.
pub const WALL_KICKS: [(i8, i8); 5] = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0)];

/// Would the player collide if moved by `(dx, dy)`?
///
/// A filled cell collides when it lands outside `[0, width)` horizontally, at or
/// below the bottom edge, or on an occupied cell. Cells above the top edge
/// (negative row) only get the horizontal check.
pub fn check_collision(player: &Player, board: &Board, dx: i8, dy: i8) -> bool {
    player.cells().any(|(x, y)| {
        let x = x + dx;
        let y = y + dy;

        if x < 0 || x >= BOARD_WIDTH as i8 {
            return true;
        }
        if y < 0 {
            return false;
        }
        y >= BOARD_HEIGHT as i8 || board.is_occupied(x, y)
    })
}

/// Rotate a square matrix by 90°.
///
/// Transposes, then reverses each row for clockwise (`direction > 0`) or the row
/// order for counter-clockwise. The piece position is not touched.
pub fn rotate(shape: &Shape, direction: i8) -> Shape {
    let n = shape.size();
    if direction > 0 {
        Shape::from_fn(n, |x, y| shape.is_filled(y, n - 1 - x))
    } else {
        Shape::from_fn(n, |x, y| shape.is_filled(n - 1 - y, x))
    }
}

/// Rotate the player in place on the board, trying [`WALL_KICKS`].
///
/// Returns the rotated (and possibly shifted) player, or `None` when every kick
/// collides, in which case the caller keeps the original.
pub fn try_rotate(player: &Player, board: &Board, direction: i8) -> Option<Player> {
    let candidate = Player {
        shape: rotate(&player.shape, direction),
        ..*player
    };

    WALL_KICKS
        .iter()
        .find(|&&(dx, dy)| !check_collision(&candidate, board, dx, dy))
        .map(|&(dx, dy)| Player {
            pos: Position::new(candidate.pos.x + dx, candidate.pos.y + dy),
            ..candidate
        })
}

/// Write the player's filled cells into a copy of `board`.
///
/// Cells that fall outside the board are skipped.
pub fn merge_tetromino(board: &Board, player: &Player) -> Board {
    let mut merged = board.clone();
    for (x, y) in player.cells() {
        merged.set(x, y, Some(player.kind));
    }
    merged
}

/// How many rows the player can fall before colliding.
pub fn landing_offset(player: &Player, board: &Board) -> i8 {
    let mut offset = 0;
    while !check_collision(player, board, 0, offset + 1) {
        offset += 1;
    }
    offset
}
