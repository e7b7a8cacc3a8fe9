//! Board module - the fixed 10x20 playfield
//!
//! Cells are stored as a contiguous array of rows of [`Cell`] (`None` = empty).
//! The integer view used by renderers (`0` = empty, piece marker otherwise) is
//! produced on demand by [`Board::to_markers`].
//!
//! Boards are values: line clearing and merging return a new board and leave
//! the input untouched, so a renderer holding the previous board never sees a
//! half-applied update.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// One board row
pub type Row = [Cell; WIDTH];

/// Integer grid view of a board
pub type MarkerGrid = [[u8; WIDTH]; HEIGHT];

/// The game board - 10 columns x 20 rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: [Row; HEIGHT],
}

/// Result of [`Board::clear_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClear {
    /// Board with full rows removed and empty rows prepended
    pub board: Board,
    /// Original indices of removed rows, top to bottom
    pub rows: ArrayVec<usize, HEIGHT>,
}

impl LineClear {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            rows: [[None; WIDTH]; HEIGHT],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<(usize, usize)> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y); `None` if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|(x, y)| self.rows[y][x])
    }

    /// Set cell at position (x, y); returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some((x, y)) => {
                self.rows[y][x] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// In bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Row `y`; panics if `y` is out of bounds.
    pub fn row(&self, y: usize) -> &Row {
        &self.rows[y]
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < HEIGHT && self.rows[y].iter().all(|cell| cell.is_some())
    }

    /// Number of filled cells on the board
    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|c| c.is_some())
            .count()
    }

    /// Integer view: `0` for empty, [`PieceKind::marker`] otherwise.
    pub fn to_markers(&self) -> MarkerGrid {
        let mut grid = [[0u8; WIDTH]; HEIGHT];
        self.write_markers(&mut grid);
        grid
    }

    /// Write the integer view into an existing grid (no allocation).
    pub fn write_markers(&self, grid: &mut MarkerGrid) {
        for (out_row, row) in grid.iter_mut().zip(&self.rows) {
            for (out, cell) in out_row.iter_mut().zip(row) {
                *out = cell.map_or(0, PieceKind::marker);
            }
        }
    }

    /// Build a board from an integer grid. Unknown markers read as empty.
    pub fn from_markers(grid: &MarkerGrid) -> Self {
        let mut board = Self::new();
        for (row, markers) in board.rows.iter_mut().zip(grid) {
            for (cell, &marker) in row.iter_mut().zip(markers) {
                *cell = PieceKind::from_marker(marker);
            }
        }
        board
    }

    /// Remove every full row and prepend empty rows until the height is restored.
    ///
    /// Scans bottom to top with a write cursor, copying surviving rows down
    /// into a copy of the board.
    pub fn clear_lines(&self) -> LineClear {
        let mut next = self.clone();
        let mut rows = ArrayVec::new();
        let mut write_y = HEIGHT;

        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                rows.push(read_y);
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                next.rows[write_y] = self.rows[read_y];
            }
        }

        next.rows[..write_y].fill([None; WIDTH]);

        rows.reverse();
        LineClear { board: next, rows }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some((0, 0)));
        assert_eq!(Board::index(9, 0), Some((9, 0)));
        assert_eq!(Board::index(0, 1), Some((0, 1)));
        assert_eq!(Board::index(9, 19), Some((9, 19)));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.filled_count(), 0);
        assert_eq!(board.to_markers(), [[0u8; 10]; 20]);
    }

    #[test]
    fn test_markers_roundtrip() {
        let mut board = Board::new();
        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        let grid = board.to_markers();
        assert_eq!(grid[0][0], PieceKind::I.marker());
        assert_eq!(grid[10][5], PieceKind::T.marker());
        assert_eq!(Board::from_markers(&grid), board);
    }

    #[test]
    fn test_clear_lines_reports_original_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 5, PieceKind::I);
        fill_row(&mut board, 12, PieceKind::J);
        board.set(2, 11, Some(PieceKind::T));
        board.set(7, 4, Some(PieceKind::S));

        let clear = board.clear_lines();

        assert_eq!(clear.count(), 2);
        assert_eq!(clear.rows.as_slice(), &[5, 12]);
        // Row 11 had one row cleared below it -> moves down one.
        assert_eq!(clear.board.get(2, 12), Some(Some(PieceKind::T)));
        // Row 4 had two cleared rows below it -> moves down two.
        assert_eq!(clear.board.get(7, 6), Some(Some(PieceKind::S)));
        assert!(clear.board.row(0).iter().all(Option::is_none));
        assert!(clear.board.row(1).iter().all(Option::is_none));
    }

    #[test]
    fn test_clear_lines_leaves_input_untouched() {
        let mut board = Board::new();
        fill_row(&mut board, 19, PieceKind::O);
        let before = board.clone();

        let clear = board.clear_lines();

        assert_eq!(board, before);
        assert_eq!(clear.board.filled_count(), 0);
    }

    #[test]
    fn test_clear_lines_nothing_full() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::L));
        let clear = board.clear_lines();
        assert_eq!(clear.count(), 0);
        assert_eq!(clear.board, board);
    }

    #[test]
    fn test_clear_every_row() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            fill_row(&mut board, y, PieceKind::Z);
        }
        let clear = board.clear_lines();
        assert_eq!(clear.count(), 20);
        assert_eq!(clear.board, Board::new());
    }
}
