//! Upcoming-piece queue
//!
//! A fixed-length FIFO: taking the head appends exactly one fresh draw, so the
//! preview length never changes.

use crate::rng::{PieceSource, Randomizer};
use crate::types::{PieceKind, NEXT_QUEUE_LEN};

#[derive(Debug, Clone)]
pub struct NextQueue {
    pieces: [PieceKind; NEXT_QUEUE_LEN],
    source: PieceSource,
}

impl NextQueue {
    pub fn new(mut source: PieceSource) -> Self {
        let pieces = std::array::from_fn(|_| source.draw());
        Self { pieces, source }
    }

    /// Take the head and refill the tail with one new draw.
    pub fn pop_front(&mut self) -> PieceKind {
        let head = self.pieces[0];
        self.pieces.rotate_left(1);
        self.pieces[NEXT_QUEUE_LEN - 1] = self.source.draw();
        head
    }

    pub fn pieces(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.pieces
    }

    pub fn randomizer(&self) -> Randomizer {
        self.source.randomizer()
    }

    /// Seed for a fresh queue after a restart
    pub fn next_seed(&self) -> u32 {
        self.source.next_seed()
    }
}
