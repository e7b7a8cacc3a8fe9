//! Line-clear particles
//!
//! Pure data for renderers: positions are in board cell units, time in
//! milliseconds. A field is seeded like the game, so bursts replay identically.

use std::f32::consts::TAU;

use crate::catalog::color_of;
use crate::game_state::LockEvent;
use crate::rng::SimpleRng;
use crate::types::Rgb;

/// Upper bound on live particles; new bursts are truncated past it.
pub const MAX_PARTICLES: usize = 512;
pub const PARTICLES_PER_CELL: usize = 2;
/// Downward acceleration in cells per second squared
pub const GRAVITY: f32 = 30.0;

const MIN_SPEED: f32 = 4.0;
const MAX_SPEED: f32 = 12.0;
const MIN_LIFE_MS: u32 = 250;
const MAX_LIFE_MS: u32 = 650;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleEffect {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life_ms: u32,
    pub max_life_ms: u32,
    pub color: Rgb,
    pub size: f32,
}

impl ParticleEffect {
    /// Remaining life in `[0, 1]`, for fading.
    pub fn life_ratio(&self) -> f32 {
        if self.max_life_ms == 0 {
            return 0.0;
        }
        self.life_ms as f32 / self.max_life_ms as f32
    }

    fn update(&mut self, elapsed_ms: u32) {
        let dt = elapsed_ms as f32 / 1000.0;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.vy += GRAVITY * dt;
        self.life_ms = self.life_ms.saturating_sub(elapsed_ms);
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<ParticleEffect>,
    rng: SimpleRng,
}

impl ParticleField {
    pub fn new(seed: u32) -> Self {
        Self {
            particles: Vec::with_capacity(MAX_PARTICLES),
            rng: SimpleRng::new(seed),
        }
    }

    /// Burst from every cell of every cleared row, colored by the piece that
    /// filled the cell.
    pub fn spawn_line_clear(&mut self, event: &LockEvent) {
        for (&y, row) in event.rows.iter().zip(event.row_cells.iter()) {
            for (x, cell) in row.iter().enumerate() {
                let Some(kind) = cell else { continue };
                for _ in 0..PARTICLES_PER_CELL {
                    if self.particles.len() >= MAX_PARTICLES {
                        return;
                    }
                    let particle = self.emit(x as f32 + 0.5, y as f32 + 0.5, color_of(*kind));
                    self.particles.push(particle);
                }
            }
        }
    }

    fn emit(&mut self, x: f32, y: f32, color: Rgb) -> ParticleEffect {
        let angle = self.rng.range_f32(0.0, TAU);
        let speed = self.rng.range_f32(MIN_SPEED, MAX_SPEED);
        let life_ms = MIN_LIFE_MS + self.rng.next_range(MAX_LIFE_MS - MIN_LIFE_MS);
        ParticleEffect {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life_ms,
            max_life_ms: life_ms,
            color,
            size: self.rng.range_f32(0.5, 1.0),
        }
    }

    /// Integrate motion and drop particles whose life ran out.
    pub fn update(&mut self, elapsed_ms: u32) {
        for particle in &mut self.particles {
            particle.update(elapsed_ms);
        }
        self.particles.retain(|p| p.life_ms > 0);
    }

    pub fn particles(&self) -> &[ParticleEffect] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, BOARD_WIDTH};
    use arrayvec::ArrayVec;

    fn clear_event(rows: &[usize]) -> LockEvent {
        let mut event = LockEvent {
            kind: PieceKind::I,
            lines_cleared: rows.len() as u32,
            rows: ArrayVec::new(),
            row_cells: ArrayVec::new(),
            score_delta: 0,
            combo: 1,
            level_up: false,
            game_over: false,
        };
        for &y in rows {
            event.rows.push(y);
            event.row_cells.push([Some(PieceKind::T); BOARD_WIDTH as usize]);
        }
        event
    }

    #[test]
    fn test_burst_per_cleared_cell() {
        let mut field = ParticleField::new(1);
        field.spawn_line_clear(&clear_event(&[19]));

        assert_eq!(field.len(), BOARD_WIDTH as usize * PARTICLES_PER_CELL);
        let purple = color_of(PieceKind::T);
        assert!(field.particles().iter().all(|p| p.color == purple));
        assert!(field.particles().iter().all(|p| (19.0..20.0).contains(&p.y)));
    }

    #[test]
    fn test_no_lines_no_particles() {
        let mut field = ParticleField::new(1);
        field.spawn_line_clear(&clear_event(&[]));
        assert!(field.is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut field = ParticleField::new(1);
        field.spawn_line_clear(&clear_event(&[10, 11]));
        assert!(!field.is_empty());

        field.update(100);
        assert!(!field.is_empty());
        field.update(MAX_LIFE_MS);
        assert!(field.is_empty());
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut field = ParticleField::new(4);
        field.spawn_line_clear(&clear_event(&[5]));
        let before: Vec<f32> = field.particles().iter().map(|p| p.vy).collect();

        field.update(100);

        for (p, vy) in field.particles().iter().zip(before) {
            assert!(p.vy > vy);
        }
    }

    #[test]
    fn test_capped() {
        let mut field = ParticleField::new(1);
        for _ in 0..100 {
            field.spawn_line_clear(&clear_event(&[0, 1, 2, 3]));
        }
        assert_eq!(field.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_same_seed_same_burst() {
        let mut a = ParticleField::new(8);
        let mut b = ParticleField::new(8);
        a.spawn_line_clear(&clear_event(&[3]));
        b.spawn_line_clear(&clear_event(&[3]));
        assert_eq!(a.particles(), b.particles());
    }
}
