/// Packed level codec.
///
/// ## Layout
///   ```text
///   byte 0          width
///   byte 1          height
///   bytes 2..len-2  bitstream, MSB first within each byte
///   byte len-2      player x
///   byte len-1      player y
///   ```
///
/// ## Bitstream
///   A sequence of `(run, tile)` pairs, read until exactly `width * height`
///   tiles have been produced. Trailing bits are padding.
///
///   run:   `0`            → 1
///          `1 d3 d2 d1`   → 2 + d3*4 + d2*2 + d1   (2..=9)
///   tile:  wire code from `Tile::wire_code` (2 or 3 bits)
///
/// Flat tile `p` lands on grid cell `(p % width, p / width)`.

use thiserror::Error;

use crate::domain::grid::{Grid, Position};
use crate::domain::tile::Tile;

use super::level::Level;

/// Prolog (w, h) + epilog (px, py).
const FRAME_BYTES: usize = 4;

/// Longest run a single pair can encode.
pub const MAX_RUN: usize = 9;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level buffer is {len} bytes, need at least 4")]
    TooShort { len: usize },
    #[error("level has an empty grid ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },
    #[error("bitstream ended after {emitted} of {expected} tiles")]
    Truncated { emitted: usize, expected: usize },
    #[error("run of {run} tiles at tile {emitted} overflows the {expected}-tile grid")]
    RunOverflow { run: usize, emitted: usize, expected: usize },
    #[error("player start ({x}, {y}) is outside the {width}x{height} grid")]
    PlayerOutOfBounds { x: usize, y: usize, width: usize, height: usize },
    #[error("no level with index {index}")]
    NoSuchLevel { index: usize },
    #[error("level set is empty")]
    EmptyLevelSet,
    #[error("level of {width}x{height} does not fit the one-byte size fields")]
    Oversized { width: usize, height: usize },
}

// ── Bit reader ──

/// MSB-first reader over a byte slice. Every read is bounds-checked,
/// so a corrupt stream ends in `None` instead of running off the end.
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize, // bit index
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        BitReader { bytes, pos: 0 }
    }

    fn bit(&mut self) -> Option<bool> {
        let byte = *self.bytes.get(self.pos / 8)?;
        let shift = 7 - (self.pos % 8);
        self.pos += 1;
        Some((byte >> shift) & 1 == 1)
    }

    fn run_length(&mut self) -> Option<usize> {
        if !self.bit()? {
            return Some(1);
        }
        let mut run = 2;
        for weight in [4, 2, 1] {
            if self.bit()? {
                run += weight;
            }
        }
        Some(run)
    }

    fn tile(&mut self) -> Option<Tile> {
        let first = self.bit()?;
        let second = self.bit()?;
        match Tile::from_prefix(first, second) {
            Some(tile) => Some(tile),
            None => Some(Tile::from_long_suffix(self.bit()?)),
        }
    }
}

// ── Bit writer ──

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    len: usize, // bits written
}

impl BitWriter {
    fn push(&mut self, bit: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 1 << (7 - self.len % 8);
        }
        self.len += 1;
    }

    /// Push the low `len` bits of `bits`, most significant first.
    fn push_bits(&mut self, bits: u8, len: u8) {
        for i in (0..len).rev() {
            self.push((bits >> i) & 1 == 1);
        }
    }

    fn run_length(&mut self, run: usize) {
        debug_assert!((1..=MAX_RUN).contains(&run));
        if run == 1 {
            self.push(false);
        } else {
            self.push(true);
            self.push_bits((run - 2) as u8, 3);
        }
    }

    fn tile(&mut self, tile: Tile) {
        let code = tile.wire_code();
        self.push_bits(code.bits, code.len);
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Decode a packed level buffer.
///
/// Fails instead of panicking or looping on corrupt input: the number of
/// pairs read is bounded by the bits available.
pub fn decode(buffer: &[u8]) -> Result<Level, LevelError> {
    if buffer.len() < FRAME_BYTES {
        return Err(LevelError::TooShort { len: buffer.len() });
    }
    let width = buffer[0] as usize;
    let height = buffer[1] as usize;
    if width == 0 || height == 0 {
        return Err(LevelError::EmptyGrid { width, height });
    }
    let expected = width * height;
    let px = buffer[buffer.len() - 2] as usize;
    let py = buffer[buffer.len() - 1] as usize;

    let mut reader = BitReader::new(&buffer[2..buffer.len() - 2]);
    let mut flat: Vec<Tile> = Vec::with_capacity(expected);

    while flat.len() != expected {
        let truncated = LevelError::Truncated { emitted: flat.len(), expected };
        let run = reader.run_length().ok_or(truncated.clone())?;
        let tile = reader.tile().ok_or(truncated)?;
        if flat.len() + run > expected {
            return Err(LevelError::RunOverflow { run, emitted: flat.len(), expected });
        }
        flat.extend(std::iter::repeat(tile).take(run));
    }

    let grid = Grid::from_fill_order(width, height, flat)
        .ok_or(LevelError::Truncated { emitted: 0, expected })?;
    if px >= width || py >= height {
        return Err(LevelError::PlayerOutOfBounds { x: px, y: py, width, height });
    }

    Ok(Level::new(grid, Position::new(px, py)))
}

/// Encode a level into the packed format. Inverse of `decode`.
///
/// Runs are greedy (at most `MAX_RUN` per pair) and the final byte is
/// zero-padded. Dimensions must fit in a byte and the player must stand
/// inside the grid, otherwise the bytes would decode to a different level.
#[allow(dead_code)]
pub fn encode(level: &Level) -> Result<Vec<u8>, LevelError> {
    let grid = &level.grid;
    let (width, height) = (grid.width(), grid.height());
    let (Ok(w), Ok(h)) = (u8::try_from(width), u8::try_from(height)) else {
        return Err(LevelError::Oversized { width, height });
    };
    if width == 0 || height == 0 {
        return Err(LevelError::EmptyGrid { width, height });
    }
    if !grid.contains(level.player) {
        let Position { x, y } = level.player;
        return Err(LevelError::PlayerOutOfBounds { x, y, width, height });
    }
    let mut out = vec![w, h];

    let mut bits = BitWriter::default();
    let mut tiles = grid.fill_order().peekable();
    while let Some(tile) = tiles.next() {
        let mut run = 1;
        while run < MAX_RUN && tiles.peek() == Some(&tile) {
            tiles.next();
            run += 1;
        }
        bits.run_length(run);
        bits.tile(tile);
    }

    out.extend_from_slice(&bits.bytes);
    // both below `width`/`height`, so they fit in a byte
    out.push(level.player.x as u8);
    out.push(level.player.y as u8);
    Ok(out)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
