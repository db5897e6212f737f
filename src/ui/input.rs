/// Terminal input: keyboard and mouse events to actions.
///
/// Sokoban is turn based, so every key press (and every auto-repeat from a
/// held key) is one action, queued in arrival order. Release events are
/// ignored. A mouse button press inside one of the screen regions fires
/// that region's command.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::domain::entity::Command;
use crate::ui::zones;

/// What the player asked for. `Quit` sits outside the game's command set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Play(Command),
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_UNDO: &[KeyCode] = &[
    KeyCode::Backspace,
    KeyCode::Char('u'), KeyCode::Char('U'),
    KeyCode::Char('z'), KeyCode::Char('Z'),
];
const KEYS_NEXT: &[KeyCode] = &[KeyCode::PageUp, KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_PREVIOUS: &[KeyCode] = &[KeyCode::PageDown, KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map a single key event. Releases map to nothing.
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Quit),
            _ => None,
        };
    }

    let code = &key.code;
    let command = if KEYS_UP.contains(code) {
        Command::MoveUp
    } else if KEYS_DOWN.contains(code) {
        Command::MoveDown
    } else if KEYS_LEFT.contains(code) {
        Command::MoveLeft
    } else if KEYS_RIGHT.contains(code) {
        Command::MoveRight
    } else if KEYS_UNDO.contains(code) {
        Command::Undo
    } else if KEYS_NEXT.contains(code) {
        Command::NextLevel
    } else if KEYS_PREVIOUS.contains(code) {
        Command::PreviousLevel
    } else if KEYS_QUIT.contains(code) {
        return Some(Action::Quit);
    } else {
        return None;
    };
    Some(Action::Play(command))
}

/// Map a mouse event on a `cols` x `rows` screen. Only button presses count.
pub fn action_for_mouse(mouse: &MouseEvent, cols: u16, rows: u16) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(_) => {
            zones::hit(mouse.column, mouse.row, cols, rows).map(Action::Play)
        }
        _ => None,
    }
}

pub struct InputState {
    /// Actions collected by the most recent `drain_events()` call.
    actions: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { actions: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before handling actions.
    pub fn drain_events(&mut self, cols: u16, rows: u16) {
        self.actions.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            let action = match event::read() {
                Ok(Event::Key(key)) => action_for_key(&key),
                Ok(Event::Mouse(mouse)) => action_for_mouse(&mouse, cols, rows),
                _ => None,
            };
            if let Some(a) = action {
                self.actions.push(a);
            }
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
