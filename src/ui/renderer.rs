/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only reads a `Snapshot` and the HUD; it never touches the
/// session.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetTitle},
};

use crate::domain::entity::Direction;
use crate::domain::grid::Position;
use crate::domain::tile::Tile;
use crate::sim::session::Snapshot;
use crate::ui::hud::Hud;
use crate::ui::zones::ZONES;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the gap
    /// between rows matches the cell colour on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Each tile is drawn as 2 terminal columns by 1 row.
const CELL_W: usize = 2;

const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
/// Message bar and help line at the bottom.
const FOOTER_ROWS: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const GOAL_BG: Color = Color::Rgb { r: 70, g: 60, b: 10 };

/// Where the board lands on screen, or `None` if it does not fit.
fn board_origin(width: usize, height: usize, term_w: usize, term_h: usize) -> Option<(usize, usize)> {
    let area_w = term_w;
    let area_h = term_h.saturating_sub(MAP_ROW + FOOTER_ROWS);
    let board_w = width * CELL_W;
    if board_w > area_w || height > area_h {
        return None;
    }
    Some(((area_w - board_w) / 2, MAP_ROW + (area_h - height) / 2))
}

/// Two-column glyph and colours for a tile.
fn tile_glyph(tile: Tile) -> (char, char, Color, Color) {
    match tile {
        Tile::Empty     => (' ', ' ', Color::Reset, Color::Reset),
        Tile::Wall      => ('█', '█', Color::Rgb { r: 120, g: 120, b: 120 }, Color::Rgb { r: 70, g: 70, b: 70 }),
        Tile::Goal      => ('·', '·', Color::Rgb { r: 255, g: 220, b: 50 }, GOAL_BG),
        Tile::Box       => ('[', ']', Color::Rgb { r: 255, g: 200, b: 120 }, Color::Rgb { r: 120, g: 75, b: 30 }),
        Tile::PlacedBox => ('[', ']', Color::Rgb { r: 200, g: 255, b: 200 }, Color::Rgb { r: 30, g: 120, b: 50 }),
    }
}

fn facing_arrow(facing: Direction) -> char {
    match facing {
        Direction::Up    => '↑',
        Direction::Down  => '↓',
        Direction::Left  => '←',
        Direction::Right => '→',
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            SetTitle("Sokoban"),
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Terminal size as of the last frame, in cells.
    pub fn size(&self) -> (u16, u16) {
        (self.term_w as u16, self.term_h as u16)
    }

    pub fn render(&mut self, snap: &Snapshot, hud: &Hud, pad_connected: bool) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose(snap, hud, pad_connected);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        // Explicit base colours, never ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, snap: &Snapshot, hud: &Hud, pad_connected: bool) {
        self.front.clear();
        self.compose_hud(snap, hud, pad_connected);

        match board_origin(snap.width, snap.height, self.front.width, self.front.height) {
            Some((col, row)) => self.compose_board(snap, col, row),
            None => {
                let need = format!(
                    "Terminal too small: need {}x{}",
                    snap.width * CELL_W,
                    snap.height + MAP_ROW + FOOTER_ROWS,
                );
                let x = self.front.width.saturating_sub(need.chars().count()) / 2;
                self.front.put_str(x, MAP_ROW, &need, Color::Rgb { r: 255, g: 80, b: 80 }, Color::Reset);
            }
        }

        self.compose_footer(hud);
        self.compose_zones();
    }

    fn compose_hud(&mut self, snap: &Snapshot, hud: &Hud, pad_connected: bool) {
        self.front.fill_row(HUD_ROW, HUD_BG);
        let pad = if pad_connected { "  [pad]" } else { "" };
        let line = format!(
            "    Level {}/{}  {}  Moves:{:<5} Boxes left:{:<3} {:>3} fps{}",
            snap.level_index + 1,
            snap.level_count,
            snap.level_name,
            snap.moves,
            snap.boxes_left,
            hud.fps(),
            pad,
        );
        self.front.put_str(0, HUD_ROW, &line, Color::White, HUD_BG);
    }

    fn compose_board(&mut self, snap: &Snapshot, col0: usize, row0: usize) {
        for y in 0..snap.height {
            for x in 0..snap.width {
                let Some(tile) = snap.grid.get(Position::new(x, y)) else { continue };
                let col = col0 + x * CELL_W;
                let row = row0 + y;

                if snap.player.pos == Position::new(x, y) {
                    let bg = if tile == Tile::Goal { GOAL_BG } else { Color::Reset };
                    let fg = Color::Rgb { r: 80, g: 255, b: 80 };
                    self.front.set(col, row, Cell::new('☺', fg, bg));
                    self.front.set(col + 1, row, Cell::new(facing_arrow(snap.player.facing), fg, bg));
                    continue;
                }

                let (c0, c1, fg, bg) = tile_glyph(tile);
                self.front.set(col, row, Cell::new(c0, fg, bg));
                self.front.set(col + 1, row, Cell::new(c1, fg, bg));
            }
        }
    }

    /// Glyph in the middle of each mouse region.
    fn compose_zones(&mut self) {
        let (cols, rows) = (self.front.width as u16, self.front.height as u16);
        let fg = Color::Rgb { r: 100, g: 200, b: 255 };
        for zone in &ZONES {
            let (x, y) = zone.center(cols, rows);
            let (x, y) = (x as usize, y as usize);
            if y == HUD_ROW {
                continue;
            }
            let bg = self.front.get(x, y).bg;
            self.front.put_str(x, y, zone.glyph, fg, bg);
        }
    }

    fn compose_footer(&mut self, hud: &Hud) {
        let Some(help_row) = self.front.height.checked_sub(1) else { return };
        let msg_row = help_row.saturating_sub(1);

        if !hud.message.is_empty() && msg_row > HUD_ROW {
            self.front.fill_row(msg_row, MSG_BG);
            let msg = format!(" ◈ {} ", hud.message);
            self.front.put_str(0, msg_row, &msg, Color::Black, MSG_BG);
        }

        let help = " ←↑→↓/WASD:Move  U/Bksp:Undo  PgUp/N:Next  PgDn/P:Prev  Q/Esc:Quit";
        self.front.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }
}
