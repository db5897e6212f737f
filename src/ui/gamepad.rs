/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (one step per press)
///   B                     →  Undo
///   R1                    →  Next level
///   L1                    →  Previous level
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::Command;
use crate::ui::input::Action;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    undo: Vec<Btn>,
    next_level: Vec<Btn>,
    previous_level: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            undo:           vec![Btn::B],
            next_level:     vec![Btn::R1],
            previous_level: vec![Btn::L1],
            quit:           vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// Names that don't parse are skipped; an entry with no valid names
    /// keeps its default.
    fn from_config(cfg: &GamepadConfig) -> Self {
        fn parse_list(names: &[String], fallback: Vec<Btn>) -> Vec<Btn> {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if parsed.is_empty() { fallback } else { parsed }
        }
        let d = ActionMap::default();
        ActionMap {
            undo: parse_list(&cfg.undo, d.undo),
            next_level: parse_list(&cfg.next_level, d.next_level),
            previous_level: parse_list(&cfg.previous_level, d.previous_level),
            quit: parse_list(&cfg.quit, d.quit),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn action_for(&self, btn: Btn) -> Option<Action> {
        if self.quit.contains(&btn) {
            Some(Action::Quit)
        } else if self.undo.contains(&btn) {
            Some(Action::Play(Command::Undo))
        } else if self.next_level.contains(&btn) {
            Some(Action::Play(Command::NextLevel))
        } else if self.previous_level.contains(&btn) {
            Some(Action::Play(Command::PreviousLevel))
        } else {
            None
        }
    }
}

/// Stick position folded into one of four directions (or none).
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_command(x: f32, y: f32) -> Option<Command> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        None
    } else if x.abs() >= y.abs() {
        Some(if x > 0.0 { Command::MoveRight } else { Command::MoveLeft })
    } else {
        Some(if y > 0.0 { Command::MoveUp } else { Command::MoveDown })
    }
}

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    stick_x: f32,
    stick_y: f32,
    /// Direction the stick currently points; a move fires when it changes.
    stick_dir: Option<Command>,

    action_map: ActionMap,

    /// Actions produced by the most recent `update()` call.
    actions: Vec<Action>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "gamepad support unavailable");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::default(),
            actions: Vec::with_capacity(4),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map = ActionMap::from_config(cfg);
    }

    pub fn update(&mut self) {
        self.actions.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                    self.update_stick();
                }
                EventType::Connected => {
                    self.connected = true;
                    tracing::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        // D-pad handled separately (not in Btn enum)
        let dpad = match gilrs_btn {
            Button::DPadUp    => Some(Command::MoveUp),
            Button::DPadDown  => Some(Command::MoveDown),
            Button::DPadLeft  => Some(Command::MoveLeft),
            Button::DPadRight => Some(Command::MoveRight),
            _ => None,
        };
        if let Some(cmd) = dpad {
            self.actions.push(Action::Play(cmd));
            return;
        }

        if let Some(action) = Btn::from_gilrs(gilrs_btn).and_then(|b| self.action_map.action_for(b)) {
            self.actions.push(action);
        }
    }

    /// Edge trigger: one move each time the stick enters a new direction.
    #[cfg(feature = "gamepad")]
    fn update_stick(&mut self) {
        let dir = stick_command(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(cmd) = dir {
                self.actions.push(Action::Play(cmd));
            }
            self.stick_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_map_matches_default_config() {
        let cfg = crate::config::GameConfig::from_toml_str("");
        assert_eq!(ActionMap::from_config(&cfg.gamepad), ActionMap::default());
    }

    #[test]
    fn config_names_are_case_insensitive_and_aliased() {
        let cfg = GamepadConfig {
            undo: names(&["east", "y"]),
            next_level: names(&["RB"]),
            previous_level: names(&["lb"]),
            quit: names(&["Back"]),
        };
        let map = ActionMap::from_config(&cfg);
        assert_eq!(map.undo, vec![Btn::B, Btn::Y]);
        assert_eq!(map.action_for(Btn::Y), Some(Action::Play(Command::Undo)));
        assert_eq!(map.action_for(Btn::R1), Some(Action::Play(Command::NextLevel)));
        assert_eq!(map.action_for(Btn::Select), Some(Action::Quit));
        assert_eq!(map.action_for(Btn::A), None);
    }

    #[test]
    fn unknown_names_keep_default() {
        let cfg = GamepadConfig {
            undo: names(&["Turbo"]),
            next_level: vec![],
            previous_level: names(&["L1"]),
            quit: names(&["Select"]),
        };
        let map = ActionMap::from_config(&cfg);
        assert_eq!(map.undo, vec![Btn::B]);
        assert_eq!(map.next_level, vec![Btn::R1]);
    }

    #[test]
    fn stick_picks_dominant_axis() {
        assert_eq!(stick_command(0.1, -0.2), None);
        assert_eq!(stick_command(0.9, 0.3), Some(Command::MoveRight));
        assert_eq!(stick_command(-0.6, 0.2), Some(Command::MoveLeft));
        assert_eq!(stick_command(0.2, 0.8), Some(Command::MoveUp));
        assert_eq!(stick_command(0.0, -0.7), Some(Command::MoveDown));
    }
}
