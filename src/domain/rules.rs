/// Move and push rules.
///
/// Pure functions over a grid and a player position. `resolve_move`
/// decides what a move does; `apply_move` performs it.
///
/// ## Move Truth Table
///
/// ┌───────────────────────┬─────────────────────┬────────────────────┐
/// │ target (1 step)        │ beyond (2 steps)     │ Result             │
/// ├───────────────────────┼─────────────────────┼────────────────────┤
/// │ Empty / Goal           │ -                    │ Walk               │
/// │ Box / PlacedBox        │ Empty                │ Push → Box         │
/// │ Box / PlacedBox        │ Goal                 │ Push → PlacedBox   │
/// │ Box / PlacedBox        │ Wall/Box/PlacedBox   │ Blocked            │
/// │ Box / PlacedBox        │ out of bounds        │ Blocked            │
/// │ Wall / out of bounds   │ -                    │ Blocked            │
/// └───────────────────────┴─────────────────────┴────────────────────┘
///
/// The cell a box leaves becomes Empty, or Goal if it was a PlacedBox.
/// The player standing on a Goal never rewrites it.

use super::entity::Direction;
use super::grid::{Grid, Position};
use super::tile::Tile;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveKind {
    Walk { to: Position },
    /// The player takes `to`, where the box was; the box lands on `box_to`.
    Push { to: Position, box_to: Position, placed: bool },
    Blocked,
}

/// Decide the effect of moving from `from` in `dir`. No mutation.
pub fn resolve_move(grid: &Grid, from: Position, dir: Direction) -> MoveKind {
    let (dx, dy) = dir.delta();
    let target_pos = match from.offset(dx, dy) {
        Some(p) => p,
        None => return MoveKind::Blocked,
    };
    let target = match grid.get(target_pos) {
        Some(t) => t,
        None => return MoveKind::Blocked,
    };

    if target.is_walkable() {
        return MoveKind::Walk { to: target_pos };
    }
    if !target.is_box() {
        return MoveKind::Blocked;
    }

    let beyond_pos = match target_pos.offset(dx, dy) {
        Some(p) => p,
        None => return MoveKind::Blocked,
    };
    match grid.get(beyond_pos).and_then(Tile::receive_box) {
        Some(landed) => MoveKind::Push {
            to: target_pos,
            box_to: beyond_pos,
            placed: landed == Tile::PlacedBox,
        },
        None => MoveKind::Blocked,
    }
}

/// Perform a resolved move. Returns the player's new position.
pub fn apply_move(grid: &mut Grid, from: Position, kind: MoveKind) -> Position {
    match kind {
        MoveKind::Walk { to } => to,
        MoveKind::Push { to, box_to, .. } => {
            let source = grid.get(to).unwrap_or(Tile::Box);
            let dest = grid.get(box_to).unwrap_or(Tile::Empty);
            grid.set(to, source.vacated());
            if let Some(landed) = dest.receive_box() {
                grid.set(box_to, landed);
            }
            to
        }
        MoveKind::Blocked => from,
    }
}

/// Boxes not yet on a goal. Zero means the level is solved.
pub fn boxes_left(grid: &Grid) -> usize {
    grid.count(Tile::Box)
}

pub fn is_solved(grid: &Grid) -> bool {
    boxes_left(grid) == 0
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a grid from a string diagram (rows top to bottom).
    /// Legend:  '#'=Wall  '$'=Box  '*'=PlacedBox  '.'=Goal  ' '=Empty
    fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len();
        let width = rows[0].len();
        let mut flat = Vec::with_capacity(width * height);
        for row in rows {
            for ch in row.chars() {
                flat.push(match ch {
                    '#' => Tile::Wall,
                    '$' => Tile::Box,
                    '*' => Tile::PlacedBox,
                    '.' => Tile::Goal,
                    _   => Tile::Empty,
                });
            }
        }
        Grid::from_fill_order(width, height, flat).unwrap()
    }

    fn at(x: usize, y: usize) -> Position {
        Position::new(x, y)
    }

    fn step(grid: &mut Grid, from: Position, dir: Direction) -> Position {
        let kind = resolve_move(grid, from, dir);
        apply_move(grid, from, kind)
    }

    // ── Walking ──

    #[test]
    fn walk_onto_empty_and_goal() {
        let mut g = grid_from(&[" . "]);
        let p = step(&mut g, at(0, 0), Direction::Right);
        assert_eq!(p, at(1, 0));
        let p = step(&mut g, p, Direction::Right);
        assert_eq!(p, at(2, 0));
        // standing on the goal did not consume it
        assert_eq!(g.get(at(1, 0)), Some(Tile::Goal));
    }

    #[test]
    fn wall_blocks() {
        let mut g = grid_from(&[" #"]);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Right), MoveKind::Blocked);
        assert_eq!(step(&mut g, at(0, 0), Direction::Right), at(0, 0));
    }

    #[test]
    fn grid_edge_blocks_instead_of_panicking() {
        let g = grid_from(&["  ", "  "]);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Left), MoveKind::Blocked);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Up), MoveKind::Blocked);
        assert_eq!(resolve_move(&g, at(1, 1), Direction::Right), MoveKind::Blocked);
        assert_eq!(resolve_move(&g, at(1, 1), Direction::Down), MoveKind::Blocked);
    }

    // ── Pushing ──

    #[test]
    fn push_box_onto_empty() {
        let mut g = grid_from(&["#     #"]);
        g.set(at(3, 0), Tile::Box);
        let p = step(&mut g, at(2, 0), Direction::Right);
        assert_eq!(p, at(3, 0));
        assert_eq!(g.get(at(3, 0)), Some(Tile::Empty));
        assert_eq!(g.get(at(4, 0)), Some(Tile::Box));
        assert_eq!(g.count(Tile::Box), 1);
    }

    #[test]
    fn push_box_onto_goal_places_it() {
        let mut g = grid_from(&[" $. "]);
        let kind = resolve_move(&g, at(0, 0), Direction::Right);
        assert!(matches!(kind, MoveKind::Push { placed: true, .. }));
        let p = apply_move(&mut g, at(0, 0), kind);
        assert_eq!(p, at(1, 0));
        assert_eq!(g.get(at(1, 0)), Some(Tile::Empty));
        assert_eq!(g.get(at(2, 0)), Some(Tile::PlacedBox));
    }

    #[test]
    fn push_placed_box_off_goal_restores_goal() {
        let mut g = grid_from(&[" *  "]);
        let p = step(&mut g, at(0, 0), Direction::Right);
        assert_eq!(p, at(1, 0));
        assert_eq!(g.get(at(1, 0)), Some(Tile::Goal));
        assert_eq!(g.get(at(2, 0)), Some(Tile::Box));
    }

    #[test]
    fn push_vertically() {
        let mut g = grid_from(&[
            " ",
            "$",
            ".",
        ]);
        let p = step(&mut g, at(0, 0), Direction::Down);
        assert_eq!(p, at(0, 1));
        assert_eq!(g.get(at(0, 2)), Some(Tile::PlacedBox));
    }

    #[test]
    fn push_into_wall_is_blocked() {
        let mut g = grid_from(&["  $#"]);
        let before = g.clone();
        assert_eq!(step(&mut g, at(1, 0), Direction::Right), at(1, 0));
        assert_eq!(g, before);
    }

    #[test]
    fn push_two_boxes_is_blocked() {
        let g = grid_from(&[" $$ "]);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Right), MoveKind::Blocked);
        let g = grid_from(&[" $* "]);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Right), MoveKind::Blocked);
    }

    #[test]
    fn push_off_grid_edge_is_blocked() {
        let g = grid_from(&[" $"]);
        assert_eq!(resolve_move(&g, at(0, 0), Direction::Right), MoveKind::Blocked);
        let g = grid_from(&["$", " "]);
        assert_eq!(resolve_move(&g, at(0, 1), Direction::Up), MoveKind::Blocked);
    }

    // ── Win detection ──

    #[test]
    fn solved_when_no_loose_boxes() {
        assert!(is_solved(&grid_from(&["#*.#"])));
        assert!(is_solved(&grid_from(&["#  #"])));
        assert!(!is_solved(&grid_from(&["#*$#"])));
        assert_eq!(boxes_left(&grid_from(&["$ $*"])), 2);
    }
}
