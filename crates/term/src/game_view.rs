//! GameView: maps a [`GameSnapshot`] and live particles into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::catalog::color_of;
use crate::core::{GameSnapshot, ParticleEffect};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GamePhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board placement computed once per frame.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    show_ghost: bool,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
            show_ghost: true,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            ..Self::default()
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_ghost(mut self, show_ghost: bool) -> Self {
        self.show_ghost = show_ghost;
        self
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        particles: &[ParticleEffect],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).into_cell(' '));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_px_w + 2) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(board_px_h + 2) / 2,
                AnchorY::Top => 0,
            },
            w: board_px_w + 2,
            h: board_px_h + 2,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_px_w, board_px_h, ' ', bg);
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG));

        // Locked cells.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, &marker) in row.iter().enumerate() {
                match PieceKind::from_marker(marker) {
                    Some(kind) => self.draw_board_cell(fb, frame, x as i8, y as i8, kind),
                    None => self.draw_empty_cell(fb, frame, x as i8, y as i8),
                }
            }
        }

        if self.show_ghost && snap.phase != GamePhase::GameOver {
            let style = CellStyle::new(Rgb::new(140, 140, 140), PLAYFIELD_BG).dim();
            for (x, y) in snap.ghost_cells() {
                self.fill_cell(fb, frame, x, y, '░', style);
            }
        }

        for (x, y) in snap.player.cells() {
            self.draw_board_cell(fb, frame, x, y, snap.player.kind);
        }

        for particle in particles {
            self.draw_particle(fb, frame, particle);
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.phase {
            GamePhase::Paused => draw_overlay(fb, frame, &["PAUSED", "p to resume"]),
            GamePhase::GameOver => draw_overlay(fb, frame, &["GAME OVER", "r to restart"]),
            GamePhase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        particles: &[ParticleEffect],
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, particles, viewport, &mut fb);
        fb
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
        self.fill_cell(fb, frame, x, y, '·', style);
    }

    fn draw_board_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, kind: PieceKind) {
        let style = CellStyle::new(color_of(kind), PLAYFIELD_BG).bold();
        self.fill_cell(fb, frame, x, y, '█', style);
    }

    fn draw_particle(&self, fb: &mut FrameBuffer, frame: Frame, particle: &ParticleEffect) {
        if particle.x < 0.0 || particle.y < 0.0 {
            return;
        }
        let ch = if particle.size > 0.75 { '*' } else { '·' };
        let fg = particle.color.dimmed(0.3 + 0.7 * particle.life_ratio());
        let style = CellStyle::new(fg, PLAYFIELD_BG).bold();

        let x = (particle.x * self.cell_w as f32) as u16;
        let y = (particle.y * self.cell_h as f32) as u16;
        let max_x = BOARD_WIDTH as u16 * self.cell_w;
        let max_y = BOARD_HEIGHT as u16 * self.cell_h;
        if x < max_x && y < max_y {
            fb.put_char(frame.x + 1 + x, frame.y + 1 + y, ch, style);
        }
    }

    /// Fill one board cell; coordinates outside the board are skipped.
    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let px = frame.x + 1 + x as u16 * self.cell_w;
        let py = frame.y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("COMBO", snap.combo),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.held {
            Some(kind) => {
                let style = CellStyle::new(color_of(kind), SCREEN_BG);
                let style = if snap.can_hold { style.bold() } else { style.dim() };
                fb.put_str(panel_x, y, kind.as_str(), style);
            }
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in snap.next {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, kind.as_str(), CellStyle::new(color_of(kind), SCREEN_BG).bold());
            y = y.saturating_add(1);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Centered lines of text over the middle of the board.
fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
    let mid_y = frame.y.saturating_add(frame.h / 2);
    for (i, text) in lines.iter().enumerate() {
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y.saturating_add(i as u16), text, style);
    }
}
