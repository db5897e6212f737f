/// The command handler: one command in, one session out.
///
/// Processing order for a move:
///   1. Attempt the move (recorded even when blocked)
///   2. Win check: no loose boxes left
///   3. On win, replace the session with the next level (clamped)
///
/// Undo and navigation build a new session from the level set and swap it
/// in. If that level fails to decode, the current session is returned
/// unchanged together with a `LevelRejected` event.

use tracing::{debug, info, warn};

use crate::domain::entity::Command;
use crate::domain::rules::MoveKind;

use super::codec::LevelError;
use super::event::GameEvent;
use super::level::LevelSet;
use super::session::Session;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn apply(session: Session, command: Command, levels: &LevelSet) -> (Session, Vec<GameEvent>) {
    let mut events = Vec::new();

    let next = match command {
        Command::MoveUp | Command::MoveDown | Command::MoveLeft | Command::MoveRight => {
            resolve_move(session, command, levels, &mut events)
        }
        Command::Undo => resolve_undo(session, levels, &mut events),
        Command::NextLevel => {
            let index = session.next_index(levels);
            navigate(session, index, levels, &mut events)
        }
        Command::PreviousLevel => {
            let index = session.previous_index();
            navigate(session, index, levels, &mut events)
        }
    };

    (next, events)
}

// ══════════════════════════════════════════════════════════════
// Moves
// ══════════════════════════════════════════════════════════════

fn resolve_move(
    mut session: Session,
    command: Command,
    levels: &LevelSet,
    events: &mut Vec<GameEvent>,
) -> Session {
    let Some(dir) = command.direction() else {
        return session;
    };

    let outcome = session.attempt_move(dir);
    debug!(?dir, moved = outcome.moved(), pushed = outcome.pushed, "move");
    events.push(match outcome.kind {
        MoveKind::Walk { to } => GameEvent::Moved { dir, to },
        MoveKind::Push { box_to, placed, .. } => GameEvent::Pushed { dir, box_to, placed },
        MoveKind::Blocked => GameEvent::Blocked { dir },
    });

    if !outcome.solved {
        return session;
    }

    let index = session.index();
    info!(level = index, moves = session.history().len(), "level solved");
    events.push(GameEvent::LevelSolved { index });
    if index == levels.max_index() {
        events.push(GameEvent::AllLevelsSolved);
    }

    let next = session.next_index(levels);
    navigate(session, next, levels, events)
}

// ══════════════════════════════════════════════════════════════
// Undo
// ══════════════════════════════════════════════════════════════

fn resolve_undo(session: Session, levels: &LevelSet, events: &mut Vec<GameEvent>) -> Session {
    if session.history().is_empty() {
        events.push(GameEvent::NothingToUndo);
        return session;
    }

    match session.undone(levels) {
        Ok(previous) => {
            let remaining = previous.history().len();
            debug!(level = previous.index(), remaining, "undo replayed");
            events.push(GameEvent::Undone { remaining });
            previous
        }
        Err(err) => {
            let index = session.index();
            reject(session, index, err, events)
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Session replacement
// ══════════════════════════════════════════════════════════════

/// Swap in a freshly decoded session for `index`, or keep `current`.
fn navigate(current: Session, index: usize, levels: &LevelSet, events: &mut Vec<GameEvent>) -> Session {
    match Session::load(levels, index) {
        Ok(fresh) => {
            info!(
                level = index,
                width = fresh.grid().width(),
                height = fresh.grid().height(),
                boxes = fresh.boxes_left(),
                "level loaded"
            );
            events.push(GameEvent::LevelLoaded { index });
            fresh
        }
        Err(err) => reject(current, index, err, events),
    }
}

fn reject(current: Session, index: usize, err: LevelError, events: &mut Vec<GameEvent>) -> Session {
    warn!(level = index, error = %err, "level rejected, keeping current session");
    events.push(GameEvent::LevelRejected { index, reason: err.to_string() });
    current
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Direction;
    use crate::domain::grid::Position;
    use crate::domain::tile::Tile;
    use crate::sim::level::{LevelDef, Viewport};
    use crate::sim::test_util::{level_set, packed};

    const ONE_PUSH: &[&str] = &[
        "######",
        "#@$. #",
        "######",
    ];

    const OPEN_ROOM: &[&str] = &[
        "#######",
        "#     #",
        "# @$ .#",
        "#     #",
        "#######",
    ];

    fn run(session: Session, commands: &[Command], levels: &LevelSet) -> (Session, Vec<GameEvent>) {
        let mut all = Vec::new();
        let mut s = session;
        for &cmd in commands {
            let (next, events) = apply(s, cmd, levels);
            all.extend(events);
            s = next;
        }
        (s, all)
    }

    #[test]
    fn winning_move_advances_to_next_level() {
        let levels = level_set(&[ONE_PUSH, OPEN_ROOM]);
        let s = Session::load(&levels, 0).unwrap();
        let (s, events) = apply(s, Command::MoveRight, &levels);
        assert_eq!(s.index(), 1);
        assert!(s.history().is_empty());
        assert_eq!(
            events,
            vec![
                GameEvent::Pushed { dir: Direction::Right, box_to: Position::new(3, 1), placed: true },
                GameEvent::LevelSolved { index: 0 },
                GameEvent::LevelLoaded { index: 1 },
            ],
        );
    }

    #[test]
    fn level_without_loose_boxes_waits_for_a_move() {
        let pre_solved: &[&str] = &["####", "#@*#", "####"];
        let levels = level_set(&[pre_solved, OPEN_ROOM]);
        let s = Session::load(&levels, 0).unwrap();
        let (s, events) = apply(s, Command::Undo, &levels);
        assert_eq!(s.index(), 0);
        assert_eq!(events, vec![GameEvent::NothingToUndo]);

        let (s, events) = apply(s, Command::MoveUp, &levels);
        assert_eq!(s.index(), 1);
        assert_eq!(
            events,
            vec![
                GameEvent::Blocked { dir: Direction::Up },
                GameEvent::LevelSolved { index: 0 },
                GameEvent::LevelLoaded { index: 1 },
            ],
        );
    }

    #[test]
    fn winning_the_last_level_reloads_it() {
        let levels = level_set(&[OPEN_ROOM, ONE_PUSH]);
        let s = Session::load(&levels, 1).unwrap();
        let (s, events) = apply(s, Command::MoveRight, &levels);
        assert_eq!(s.index(), 1);
        assert_eq!(s.boxes_left(), 1, "fresh copy of the final level");
        assert!(events.contains(&GameEvent::AllLevelsSolved));
        assert!(events.contains(&GameEvent::LevelLoaded { index: 1 }));
    }

    #[test]
    fn blocked_move_emits_blocked_and_stays() {
        let levels = level_set(&[ONE_PUSH]);
        let s = Session::load(&levels, 0).unwrap();
        let (s, events) = apply(s, Command::MoveUp, &levels);
        assert_eq!(events, vec![GameEvent::Blocked { dir: Direction::Up }]);
        assert_eq!(s.history(), &[Direction::Up]);
    }

    #[test]
    fn undo_on_fresh_level_reports_nothing_to_undo() {
        let levels = level_set(&[OPEN_ROOM]);
        let s = Session::load(&levels, 0).unwrap();
        let before = s.clone();
        let (s, events) = apply(s, Command::Undo, &levels);
        assert_eq!(s, before);
        assert_eq!(events, vec![GameEvent::NothingToUndo]);
    }

    #[test]
    fn undo_steps_back_one_attempt_at_a_time() {
        let levels = level_set(&[OPEN_ROOM]);
        let s = Session::load(&levels, 0).unwrap();
        // push, then bump the wall twice
        let (s, _) = run(
            s,
            &[Command::MoveRight, Command::MoveUp, Command::MoveUp, Command::MoveUp],
            &levels,
        );
        assert_eq!(s.player().pos, Position::new(3, 1));
        assert_eq!(s.history().len(), 4);

        let (s, events) = apply(s, Command::Undo, &levels);
        assert_eq!(events, vec![GameEvent::Undone { remaining: 3 }]);
        // the undone attempt was a blocked one: position unchanged
        assert_eq!(s.player().pos, Position::new(3, 1));

        let (s, _) = run(s, &[Command::Undo, Command::Undo], &levels);
        assert_eq!(s.player().pos, Position::new(3, 2));
        assert_eq!(s.grid().get(Position::new(4, 2)), Some(Tile::Box));

        let (s, _) = apply(s, Command::Undo, &levels);
        assert_eq!(s.player().pos, Position::new(2, 2));
        assert_eq!(s.grid().get(Position::new(3, 2)), Some(Tile::Box));
        assert!(s.history().is_empty());
    }

    #[test]
    fn navigation_reloads_and_clamps() {
        let levels = level_set(&[OPEN_ROOM, ONE_PUSH]);
        let s = Session::load(&levels, 0).unwrap();
        let (s, _) = apply(s, Command::MoveLeft, &levels);

        let (s, events) = apply(s, Command::PreviousLevel, &levels);
        assert_eq!(s.index(), 0);
        assert!(s.history().is_empty(), "reloading clears history");
        assert_eq!(events, vec![GameEvent::LevelLoaded { index: 0 }]);

        let (s, _) = run(s, &[Command::NextLevel, Command::NextLevel], &levels);
        assert_eq!(s.index(), 1);
    }

    #[test]
    fn corrupt_level_keeps_current_session() {
        let defs = vec![
            LevelDef { name: "good".into(), data: packed(OPEN_ROOM) },
            LevelDef { name: "bad".into(), data: vec![0x02, 0x02, 0x00] },
        ];
        let levels = LevelSet::new(defs, Viewport::default()).unwrap();
        let s = Session::load(&levels, 0).unwrap();
        let (s, _) = apply(s, Command::MoveDown, &levels);
        let before = s.clone();

        let (s, events) = apply(s, Command::NextLevel, &levels);
        assert_eq!(s, before);
        assert_eq!(
            events,
            vec![GameEvent::LevelRejected {
                index: 1,
                reason: LevelError::TooShort { len: 3 }.to_string(),
            }],
        );
    }
}
