/// Entities and player commands.
/// The only actor is the player; boxes live in the grid as tiles.

use super::grid::Position;

/// Move direction. Also the player's facing, which is cosmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector `(dx, dy)`; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (0, -1),
            Direction::Down  => (0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The closed set of commands the game core accepts.
/// Input collaborators (keyboard, mouse zones, gamepad) map onto these.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Undo,
    NextLevel,
    PreviousLevel,
}

impl Command {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::MoveUp    => Some(Direction::Up),
            Command::MoveDown  => Some(Direction::Down),
            Command::MoveLeft  => Some(Direction::Left),
            Command::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

impl From<Direction> for Command {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up    => Command::MoveUp,
            Direction::Down  => Command::MoveDown,
            Direction::Left  => Command::MoveLeft,
            Direction::Right => Command::MoveRight,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Player {
    pub pos: Position,
    pub facing: Direction,
}

impl Player {
    /// Freshly loaded levels start facing up.
    pub fn new(pos: Position) -> Self {
        Player { pos, facing: Direction::Up }
    }
}
