/// Events emitted while handling a command.
/// The presentation layer consumes these for HUD messages; they are also
/// what gets logged.

use crate::domain::entity::Direction;
use crate::domain::grid::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Moved { dir: Direction, to: Position },
    Pushed { dir: Direction, box_to: Position, placed: bool },
    Blocked { dir: Direction },
    LevelSolved { index: usize },
    AllLevelsSolved,
    LevelLoaded { index: usize },
    Undone { remaining: usize },
    NothingToUndo,
    /// A level failed to decode; the previous session stays active.
    LevelRejected { index: usize, reason: String },
}
