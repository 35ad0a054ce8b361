/// Double-buffered, diff-based terminal renderer.
///
/// Animations build each frame into the `front` buffer with `put`/`text`;
/// `present` compares it cell by cell against the previous frame and only
/// emits terminal commands for cells that changed, batched with `queue!`
/// and flushed once. Full-screen redraws (and their flicker) only happen
/// after a resize.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for every cell, so inter-row gap pixels match
    /// on VTE-based terminals.
    pub(super) const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 30 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from every real cell; used to force a full repaint.
    const INVALID: Cell = Cell { ch: '\0', fg: Color::Magenta, bg: Color::Magenta };
}

struct Buffer {
    w: usize,
    h: usize,
    cells: Vec<Cell>,
}

impl Buffer {
    fn new() -> Self {
        Buffer { w: 0, h: 0, cells: Vec::new() }
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.cells.clear();
        self.cells.resize(w * h, Cell::BLANK);
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }
}

pub struct Renderer {
    out: BufWriter<Stdout>,
    term_w: usize,
    term_h: usize,
    front: Buffer,
    back: Buffer,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::with_capacity(64 * 1024, io::stdout()),
            term_w: 0,
            term_h: 0,
            front: Buffer::new(),
            back: Buffer::new(),
        }
    }

    /// Enter raw mode and the alternate screen. Must be paired with
    /// `cleanup` on every exit path.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.apply_size(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    fn apply_size(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    /// Start a new frame: pick up terminal resizes and blank the canvas.
    pub fn begin(&mut self) {
        let (tw, th) = terminal::size().unwrap_or((self.term_w as u16, self.term_h as u16));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.apply_size(tw as usize, th as usize);
        }
        self.front.clear();
    }

    pub fn size(&self) -> (usize, usize) {
        (self.term_w, self.term_h)
    }

    pub fn put(&mut self, x: usize, y: usize, ch: char, fg: Color, bg: Color) {
        if x < self.front.w && y < self.front.h {
            self.front.cells[y * self.front.w + x] = Cell { ch, fg, bg };
        }
    }

    pub fn text(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(x + i, y, ch, fg, bg);
        }
    }

    pub fn text_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.term_w.saturating_sub(len) / 2;
        self.text(x, y, s, fg, bg);
    }

    /// Fill a rectangle with the background color.
    pub fn fill(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.put(xx, yy, ' ', Color::White, bg);
            }
        }
    }

    /// Diff against the previous frame, emit changes, flush, swap.
    pub fn present(&mut self) -> io::Result<()> {
        let mut cur_fg = None;
        let mut cur_bg = None;
        let mut cursor_at = None;

        for y in 0..self.front.h {
            for x in 0..self.front.w {
                let idx = y * self.front.w + x;
                let cell = self.front.cells[idx];
                if cell == self.back.cells[idx] {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.out, MoveTo(x as u16, y as u16))?;
                }
                if cur_fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    cur_fg = Some(cell.fg);
                }
                if cur_bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    cur_bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.out.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

/// Palette shared by the screens.
pub mod palette {
    use crossterm::style::Color;

    pub const BG: Color = super::Cell::BASE_BG;
    pub const TITLE: Color = Color::Rgb { r: 255, g: 196, b: 64 };
    pub const TEXT: Color = Color::Rgb { r: 200, g: 205, b: 220 };
    pub const DIM: Color = Color::Rgb { r: 110, g: 115, b: 135 };
    pub const ACCENT: Color = Color::Rgb { r: 96, g: 200, b: 255 };
    pub const PADDLE: Color = Color::Rgb { r: 120, g: 220, b: 130 };
    pub const BALL: Color = Color::Rgb { r: 255, g: 255, b: 255 };
    pub const BRICK_SOFT: Color = Color::Rgb { r: 226, g: 110, b: 92 };
    pub const BRICK_TOUGH: Color = Color::Rgb { r: 186, g: 120, b: 230 };
    pub const BRICK_SOLID: Color = Color::Rgb { r: 120, g: 125, b: 140 };
    pub const WARN: Color = Color::Rgb { r: 240, g: 90, b: 90 };
}
