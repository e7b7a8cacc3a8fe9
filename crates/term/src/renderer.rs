//! Flushing frames to the terminal.
//!
//! [`TerminalRenderer`] owns stdout and the last frame it wrote. A frame of a
//! new size (or the first frame after [`TerminalRenderer::invalidate`]) is sent
//! whole; otherwise only the horizontal runs of cells that changed are sent.
//! The encoders write crossterm escape sequences into a byte buffer, so they
//! can be tested without a terminal.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// What the terminal currently shows; `None` forces a full redraw.
    shown: Option<FrameBuffer>,
    bytes: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            bytes: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen with the cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.bytes.clear();
        queue!(
            self.bytes,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.send()
    }

    /// Undo [`enter`](Self::enter).
    pub fn exit(&mut self) -> Result<()> {
        self.bytes.clear();
        queue!(
            self.bytes,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.send()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Write `fb` to the terminal.
    ///
    /// On return `fb` holds the frame shown before this one; the caller
    /// redraws over it next frame, so no buffer is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.bytes.clear();
        let mut spare = match self.shown.take() {
            Some(shown) if same_size(&shown, fb) => {
                encode_diff_into(&shown, fb, &mut self.bytes)?;
                shown
            }
            _ => {
                encode_full_into(fb, &mut self.bytes)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.send()?;

        std::mem::swap(&mut spare, fb);
        self.shown = Some(spare);
        Ok(())
    }

    fn send(&mut self) -> Result<()> {
        self.stdout.write_all(&self.bytes)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Clear the screen and write every cell of `fb`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;
    let width = usize::from(fb.width());
    if width == 0 {
        return Ok(());
    }

    let mut pen = Pen::new(out);
    for (y, row) in (0u16..).zip(fb.cells().chunks(width)) {
        queue!(pen.out, cursor::MoveTo(0, y))?;
        for &cell in row {
            pen.put(cell)?;
        }
    }
    pen.finish()
}

/// Write only the cells of `next` that differ from `prev`.
///
/// Frames of different sizes fall back to a full redraw.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    if !same_size(prev, next) {
        return encode_full_into(next, out);
    }

    let width = usize::from(next.width());
    let mut pen = Pen::new(out);
    for run in changed_runs(prev, next) {
        queue!(pen.out, cursor::MoveTo(run.x, run.y))?;
        let start = usize::from(run.y) * width + usize::from(run.x);
        for &cell in &next.cells()[start..start + usize::from(run.len)] {
            pen.put(cell)?;
        }
    }
    pen.finish()
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// A horizontal stretch of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    x: u16,
    y: u16,
    len: u16,
}

/// Runs of differing cells, row by row. Both frames must be the same size.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<Run> {
    let width = usize::from(next.width());
    let mut runs = Vec::new();
    if width == 0 {
        return runs;
    }

    let rows = prev.cells().chunks(width).zip(next.cells().chunks(width));
    for (y, (old, new)) in (0u16..).zip(rows) {
        let mut open: Option<u16> = None;
        for (x, (a, b)) in (0u16..).zip(old.iter().zip(new)) {
            match (open, a != b) {
                (None, true) => open = Some(x),
                (Some(start), false) => {
                    runs.push(Run { x: start, y, len: x - start });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            runs.push(Run { x: start, y, len: next.width() - start });
        }
    }
    runs
}

/// Writes cells, emitting style escapes only when the style changes.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn put(&mut self, cell: Cell) -> Result<()> {
        if self.style != Some(cell.style) {
            let style = cell.style;
            // SGR reset clears colors too, so it goes first.
            queue!(
                self.out,
                SetAttribute(Attribute::Reset),
                SetForegroundColor(to_color(style.fg)),
                SetBackgroundColor(to_color(style.bg))
            )?;
            if style.bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                queue!(self.out, SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        queue!(self.out, Print(cell.ch))?;
        Ok(())
    }

    /// Leave the terminal with default attributes if anything was styled.
    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
