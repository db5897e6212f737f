/// HUD state that lives outside the session: the transient message bar
/// and the frame-rate readout.

use std::time::{Duration, Instant};

use crate::sim::event::GameEvent;
use crate::sim::level::LevelSet;

/// Frames a message stays on screen (~2s at the default cadence).
const MESSAGE_FRAMES: u32 = 120;
const FPS_WINDOW: Duration = Duration::from_secs(1);

pub struct Hud {
    pub message: String,
    pub message_timer: u32,
    fps: FpsCounter,
}

impl Hud {
    pub fn new() -> Self {
        Hud {
            message: String::new(),
            message_timer: 0,
            fps: FpsCounter::new(Instant::now()),
        }
    }

    /// `duration` is in frames; 0 keeps the message until replaced.
    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Pick up the most interesting event of a step for the message bar.
    pub fn absorb(&mut self, events: &[GameEvent], levels: &LevelSet) {
        for event in events {
            if let Some(msg) = message_for(event, levels) {
                self.set_message(&msg, MESSAGE_FRAMES);
            }
        }
    }

    /// Advance one frame: count it for the fps readout and age the message.
    pub fn tick(&mut self, now: Instant) {
        self.fps.frame(now);
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 { self.message.clear(); }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps
    }
}

fn level_label(index: usize, levels: &LevelSet) -> String {
    match levels.name(index) {
        Some(name) if !name.is_empty() => format!("Level {} - {}", index + 1, name),
        _ => format!("Level {}", index + 1),
    }
}

/// Message bar text for an event. Plain moves and pushes say nothing.
fn message_for(event: &GameEvent, levels: &LevelSet) -> Option<String> {
    match event {
        GameEvent::LevelSolved { index } => Some(format!("{} solved!", level_label(*index, levels))),
        GameEvent::AllLevelsSolved => Some("All levels solved!".to_string()),
        GameEvent::LevelLoaded { index } => Some(level_label(*index, levels)),
        GameEvent::NothingToUndo => Some("Nothing to undo".to_string()),
        GameEvent::LevelRejected { index, reason } => {
            Some(format!("Level {} is damaged: {reason}", index + 1))
        }
        GameEvent::Moved { .. }
        | GameEvent::Pushed { .. }
        | GameEvent::Blocked { .. }
        | GameEvent::Undone { .. } => None,
    }
}

// ── Frame-rate counter ──

struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        FpsCounter { window_start: now, frames: 0, fps: 0 }
    }

    /// Count one frame. The readout updates once per window.
    fn frame(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
            self.frames = 0;
            self.window_start = now;
        }
    }
}
