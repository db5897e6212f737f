/// Tile kinds and their wire codes.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.
///
/// ## Wire codes (variable length, MSB first):
///   `00`  Empty      `01`  Wall       `10`  Box
///   `110` Goal       `111` PlacedBox
///
/// Box uses a 2-bit code even though Goal / PlacedBox use 3.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall,
    Box,
    PlacedBox, // box resting on a goal
    Goal,
}

/// One entry of the wire code table: `len` significant low bits of `bits`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WireCode {
    pub bits: u8,
    pub len: u8,
}

impl Tile {
    /// Can the player step onto this tile without pushing anything?
    pub fn is_walkable(self) -> bool {
        matches!(self, Tile::Empty | Tile::Goal)
    }

    /// Does this tile hold a box (on or off a goal)?
    pub fn is_box(self) -> bool {
        matches!(self, Tile::Box | Tile::PlacedBox)
    }

    /// Tile left behind when a box is pushed off this cell.
    pub fn vacated(self) -> Tile {
        match self {
            Tile::PlacedBox => Tile::Goal,
            _ => Tile::Empty,
        }
    }

    /// Tile produced when a box is pushed onto this cell.
    /// `None` if the cell cannot receive a box.
    pub fn receive_box(self) -> Option<Tile> {
        match self {
            Tile::Empty => Some(Tile::Box),
            Tile::Goal => Some(Tile::PlacedBox),
            _ => None,
        }
    }

    /// Wire code used by the packed level format.
    pub fn wire_code(self) -> WireCode {
        match self {
            Tile::Empty     => WireCode { bits: 0b00,  len: 2 },
            Tile::Wall      => WireCode { bits: 0b01,  len: 2 },
            Tile::Box       => WireCode { bits: 0b10,  len: 2 },
            Tile::Goal      => WireCode { bits: 0b110, len: 3 },
            Tile::PlacedBox => WireCode { bits: 0b111, len: 3 },
        }
    }

    /// Inverse of the first two bits of a wire code.
    /// Returns `None` for the `11` prefix, which needs a third bit.
    pub fn from_prefix(first: bool, second: bool) -> Option<Tile> {
        match (first, second) {
            (false, false) => Some(Tile::Empty),
            (false, true) => Some(Tile::Wall),
            (true, false) => Some(Tile::Box),
            (true, true) => None,
        }
    }

    /// Resolve a `11x` wire code from its third bit.
    pub fn from_long_suffix(third: bool) -> Tile {
        if third { Tile::PlacedBox } else { Tile::Goal }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}
