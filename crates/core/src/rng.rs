//! RNG module - seeded piece generation
//!
//! Pieces are drawn uniformly and independently by default. A 7-bag
//! randomizer (each kind exactly once per seven draws) is available as an
//! explicit opt-in.
//!
//! A small LCG keeps every game reproducible from its seed.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`, taken from the high bits.
    pub fn next_range(&mut self, max: u32) -> u32 {
        debug_assert!(max > 0);
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Random float in `[0, 1)`
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Random float in `[lo, hi)`
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current state; seeding a new RNG with it continues the sequence.
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Draw one piece kind uniformly.
pub fn random_tetromino(rng: &mut SimpleRng) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}

/// Piece selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Randomizer {
    /// Independent uniform draws
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds
    SevenBag,
}

impl Randomizer {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "random" => Some(Randomizer::Uniform),
            "bag" | "7bag" | "7-bag" => Some(Randomizer::SevenBag),
            _ => None,
        }
    }
}

/// Endless stream of piece kinds under a [`Randomizer`].
#[derive(Debug, Clone)]
pub struct PieceSource {
    rng: SimpleRng,
    randomizer: Randomizer,
    bag: [PieceKind; 7],
    bag_index: usize,
}

impl PieceSource {
    pub fn new(seed: u32, randomizer: Randomizer) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            randomizer,
            bag: PieceKind::ALL,
            // Empty bag: the first bag draw shuffles a fresh one.
            bag_index: PieceKind::ALL.len(),
        }
    }

    pub fn randomizer(&self) -> Randomizer {
        self.randomizer
    }

    /// Draw the next kind
    pub fn draw(&mut self) -> PieceKind {
        match self.randomizer {
            Randomizer::Uniform => random_tetromino(&mut self.rng),
            Randomizer::SevenBag => {
                if self.bag_index >= self.bag.len() {
                    self.bag = PieceKind::ALL;
                    self.rng.shuffle(&mut self.bag);
                    self.bag_index = 0;
                }
                let kind = self.bag[self.bag_index];
                self.bag_index += 1;
                kind
            }
        }
    }

    /// Seed for a follow-up game that continues this stream's randomness.
    pub fn next_seed(&self) -> u32 {
        self.rng.state()
    }
}
