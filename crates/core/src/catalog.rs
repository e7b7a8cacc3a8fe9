//! Tetromino catalog - the seven piece templates
//!
//! Each entry is a square occupancy matrix, the piece kind it belongs to and a
//! display color. Matrices are built by a `const fn` taking `[[u8; N]; N]`, so a
//! non-square or oversized entry is rejected by the compiler instead of at
//! runtime.

use crate::types::{PieceKind, Rgb, BOARD_WIDTH};

/// Largest supported matrix side (the I piece)
pub const MAX_SHAPE_SIZE: usize = 4;

/// Square occupancy matrix of a piece, anchored at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from rows of integers (0 = empty, nonzero = filled).
    pub const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        assert!(N > 0 && N <= MAX_SHAPE_SIZE, "shape side must be 1..=4");

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < N {
            let mut x = 0;
            while x < N {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }

        Self {
            size: N as u8,
            cells,
        }
    }

    /// Build a `size`×`size` shape from a predicate over `(x, y)`.
    pub fn from_fn(size: usize, filled: impl Fn(usize, usize) -> bool) -> Self {
        assert!(size > 0 && size <= MAX_SHAPE_SIZE, "shape side must be 1..=4");

        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (y, row) in cells.iter_mut().enumerate().take(size) {
            for (x, cell) in row.iter_mut().enumerate().take(size) {
                *cell = filled(x, y);
            }
        }

        Self {
            size: size as u8,
            cells,
        }
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether `(x, y)` inside the matrix is filled. Outside is empty.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.size() && y < self.size() && self.cells[y][x]
    }

    /// Offsets of every filled cell, row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (i8, i8)> {
        let shape = *self;
        let size = shape.size();
        (0..size).flat_map(move |y| {
            (0..size)
                .filter(move |&x| shape.cells[y][x])
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.filled_cells().count()
    }

    /// Rows as text (`#` filled, `.` empty)
    #[cfg(test)]
    pub(crate) fn to_rows(&self) -> Vec<String> {
        (0..self.size())
            .map(|y| {
                (0..self.size())
                    .map(|x| if self.cells[y][x] { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }
}

/// Column/row offset of a piece's matrix origin within the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Rgb,
}

/// All seven templates, in [`PieceKind::ALL`] order.
pub const TETROMINOS: [Tetromino; 7] = [
    Tetromino {
        kind: PieceKind::I,
        shape: Shape::from_rows([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
        color: Rgb::new(0, 240, 240),
    },
    Tetromino {
        kind: PieceKind::O,
        shape: Shape::from_rows([[1, 1], [1, 1]]),
        color: Rgb::new(240, 240, 0),
    },
    Tetromino {
        kind: PieceKind::T,
        shape: Shape::from_rows([[0, 1, 0], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(160, 0, 240),
    },
    Tetromino {
        kind: PieceKind::S,
        shape: Shape::from_rows([[0, 1, 1], [1, 1, 0], [0, 0, 0]]),
        color: Rgb::new(0, 240, 0),
    },
    Tetromino {
        kind: PieceKind::Z,
        shape: Shape::from_rows([[1, 1, 0], [0, 1, 1], [0, 0, 0]]),
        color: Rgb::new(240, 0, 0),
    },
    Tetromino {
        kind: PieceKind::J,
        shape: Shape::from_rows([[1, 0, 0], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(0, 0, 240),
    },
    Tetromino {
        kind: PieceKind::L,
        shape: Shape::from_rows([[0, 0, 1], [1, 1, 1], [0, 0, 0]]),
        color: Rgb::new(240, 160, 0),
    },
];

/// Catalog lookup by kind
pub fn tetromino(kind: PieceKind) -> &'static Tetromino {
    &TETROMINOS[kind.index()]
}

/// Display color of a kind
pub fn color_of(kind: PieceKind) -> Rgb {
    tetromino(kind).color
}

/// Default spawn position: horizontally centered, top row.
pub fn spawn_position(shape: &Shape) -> Position {
    let x = (BOARD_WIDTH as i8 - shape.size() as i8) / 2;
    Position::new(x, 0)
}
