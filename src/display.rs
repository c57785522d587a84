//! Rendering layer: all terminal I/O lives here.
//!
//! The core hands over a list of primitives in arena pixels.  They are
//! rasterized onto a character grid (one cell = 10×20 px, so the 640×480
//! arena maps to 64×24 cells) and the grid is written with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use tank_battle::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use tank_battle::entities::GameStatus;
use tank_battle::render::{Primitive, Rgba};

const CELL_W: f32 = 10.0;
const CELL_H: f32 = 20.0;

pub const COLS: u16 = (SCREEN_WIDTH / CELL_W) as u16;
pub const ROWS: u16 = (SCREEN_HEIGHT / CELL_H) as u16;

/// Arena plus one row for the controls hint.
pub const MIN_COLS: u16 = COLS;
pub const MIN_ROWS: u16 = ROWS + 1;

const C_HINT: Color = Color::DarkGrey;

// ── Character grid ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Option<Color>,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::Reset,
    bg: None,
};

struct Canvas {
    cells: Vec<Cell>,
    /// Column after the last text run on each row, so labels never overlap.
    text_end: Vec<i32>,
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

impl Canvas {
    fn new() -> Self {
        Canvas {
            cells: vec![BLANK; COLS as usize * ROWS as usize],
            text_end: vec![0; ROWS as usize],
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= COLS as i32 || row >= ROWS as i32 {
            return None;
        }
        self.cells.get_mut(row as usize * COLS as usize + col as usize)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let c0 = (x / CELL_W).floor() as i32;
        let r0 = (y / CELL_H).floor() as i32;
        // Anything narrower than a cell still covers the cell it starts in.
        let c1 = (((x + w) / CELL_W).ceil() as i32 - 1).max(c0);
        let r1 = (((y + h) / CELL_H).ceil() as i32 - 1).max(r0);
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    *cell = Cell {
                        ch: ' ',
                        fg: Color::Reset,
                        bg: Some(color),
                    };
                }
            }
        }
    }

    /// Barrel lines only mark empty cells; they never paint over a body.
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color) {
        let ch = if x1 == x2 { '│' } else { '─' };
        const SAMPLES: i32 = 4;
        for i in 1..=SAMPLES {
            let t = i as f32 / SAMPLES as f32;
            let x = x1 + (x2 - x1) * t;
            let y = y1 + (y2 - y1) * t;
            let col = (x / CELL_W).floor() as i32;
            let row = (y / CELL_H).floor() as i32;
            if let Some(cell) = self.cell_mut(col, row) {
                if cell.bg.is_none() {
                    cell.ch = ch;
                    cell.fg = color;
                }
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let row = (y / CELL_H).floor() as i32;
        if row < 0 || row >= ROWS as i32 {
            return;
        }
        let mut col = (x / CELL_W).floor() as i32;
        let taken = self.text_end[row as usize];
        if taken > 0 && col < taken + 1 {
            col = taken + 1;
        }
        for ch in text.chars() {
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = ch;
                cell.fg = color;
            }
            col += 1;
        }
        self.text_end[row as usize] = col;
    }

    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::FillRect { x, y, w, h, color } => {
                self.fill_rect(*x, *y, *w, *h, to_color(*color))
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                color,
            } => self.line(*x1, *y1, *x2, *y2, to_color(*color)),
            Primitive::Text { x, y, text, color } => self.text(*x, *y, text, to_color(*color)),
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    primitives: &[Primitive],
    status: GameStatus,
) -> std::io::Result<()> {
    let mut canvas = Canvas::new();
    for primitive in primitives {
        canvas.draw(primitive);
    }

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    // Only emit colour changes when they differ from the previous cell
    let mut current: Option<(Color, Option<Color>)> = None;
    for row in 0..ROWS {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..COLS {
            let cell = canvas.cells[row as usize * COLS as usize + col as usize];
            if current != Some((cell.fg, cell.bg)) {
                out.queue(style::SetForegroundColor(cell.fg))?;
                out.queue(style::SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                current = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.ch))?;
        }
    }
    out.queue(style::ResetColor)?;

    draw_hint(out, status)?;

    // Park cursor in a harmless spot and flush
    out.queue(cursor::MoveTo(0, ROWS))?;
    out.flush()?;
    Ok(())
}

// ── Controls hint (row below the arena) ───────────────────────────────────────

fn draw_hint<W: Write>(out: &mut W, status: GameStatus) -> std::io::Result<()> {
    let hint = if status.is_terminal() {
        "R - Play Again  Q - Quit"
    } else {
        "← ↑ → ↓ / W A S D : Move   SPACE : Shoot   Q : Quit"
    };
    out.queue(cursor::MoveTo(1, ROWS))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    out.queue(style::ResetColor)?;
    Ok(())
}
