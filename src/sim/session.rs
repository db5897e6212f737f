/// Session: the live state of one level attempt.
///
/// ## Lifecycle
///   A session is `(level index, live level, move history)`. It is created
///   by decoding a level and replaced wholesale on navigation, undo and
///   win-advance. Only `attempt_move` mutates a session in place.
///
/// ## History
///   Every attempted move is appended, including ones that were blocked.
///   Undo decodes the level again and replays all but the last entry, so a
///   session can always be rebuilt from `(index, history)` alone.

use crate::domain::entity::{Direction, Player};
use crate::domain::grid::Grid;
use crate::domain::rules::{self, MoveKind};

use super::codec::LevelError;
use super::level::{DisplayTransform, Level, LevelSet};

/// What a single move attempt did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MoveOutcome {
    pub kind: MoveKind,
    /// A box moved, so the grid changed.
    pub pushed: bool,
    /// No loose boxes remain after this move.
    pub solved: bool,
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        !matches!(self.kind, MoveKind::Blocked)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    index: usize,
    level: Level,
    player: Player,
    history: Vec<Direction>,
}

/// Read-only view handed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub width: usize,
    pub height: usize,
    pub player: Player,
    pub level_index: usize,
    pub level_count: usize,
    pub level_name: &'a str,
    pub moves: usize,
    pub boxes_left: usize,
    pub transform: DisplayTransform,
}

impl Session {
    /// Fresh session for `index`, with an empty history.
    pub fn load(levels: &LevelSet, index: usize) -> Result<Self, LevelError> {
        let level = levels.decode(index)?;
        Ok(Session::from_level(index, level))
    }

    pub fn from_level(index: usize, level: Level) -> Self {
        let player = Player::new(level.player);
        Session { index, level, player, history: Vec::new() }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn grid(&self) -> &Grid {
        &self.level.grid
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn history(&self) -> &[Direction] {
        &self.history
    }

    pub fn boxes_left(&self) -> usize {
        self.level.boxes_left()
    }

    /// Try to move (or push) in `dir`.
    ///
    /// The attempt is recorded and the player turns to face `dir` whether
    /// or not anything moved.
    pub fn attempt_move(&mut self, dir: Direction) -> MoveOutcome {
        self.history.push(dir);
        self.player.facing = dir;

        let kind = rules::resolve_move(&self.level.grid, self.player.pos, dir);
        self.player.pos = rules::apply_move(&mut self.level.grid, self.player.pos, kind);
        self.level.player = self.player.pos;

        MoveOutcome {
            kind,
            pushed: matches!(kind, MoveKind::Push { .. }),
            solved: rules::is_solved(&self.level.grid),
        }
    }

    /// Session one move earlier: the level decoded again with every move
    /// but the last replayed in order. With no history this is a copy of
    /// the current session.
    pub fn undone(&self, levels: &LevelSet) -> Result<Session, LevelError> {
        let Some((_, replay)) = self.history.split_last() else {
            return Ok(self.clone());
        };
        let mut session = Session::load(levels, self.index)?;
        for &dir in replay {
            session.attempt_move(dir);
        }
        Ok(session)
    }

    /// Index a `NextLevel` (or a win) moves to, clamped to the last level.
    pub fn next_index(&self, levels: &LevelSet) -> usize {
        levels.clamp(self.index + 1)
    }

    /// Index a `PreviousLevel` moves to, clamped to the first level.
    pub fn previous_index(&self) -> usize {
        self.index.saturating_sub(1)
    }

    pub fn snapshot<'a>(&'a self, levels: &'a LevelSet) -> Snapshot<'a> {
        let (width, height) = (self.level.width(), self.level.height());
        Snapshot {
            grid: &self.level.grid,
            width,
            height,
            player: self.player,
            level_index: self.index,
            level_count: levels.len(),
            level_name: levels.name(self.index).unwrap_or(""),
            moves: self.history.len(),
            boxes_left: self.boxes_left(),
            transform: DisplayTransform::fit(width, height, levels.viewport()),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
