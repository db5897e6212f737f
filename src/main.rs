/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::LevelSet;
use sim::session::{Session, Snapshot};
use sim::step;
use ui::gamepad::GamepadState;
use ui::hud::Hud;
use ui::input::{Action, InputState};
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Could not open log file {}: {e}", config.log.file.display());
    }
    for w in &config.warnings {
        warn!("{w}");
    }

    let levels = LevelSet::embedded(config.viewport);
    let start = levels.clamp(config.start_level);
    info!(
        levels = levels.len(),
        start_level = start,
        frame_ms = config.frame_ms,
        "starting"
    );

    let session = match Session::load(&levels, start) {
        Ok(s) => s,
        Err(e) => {
            error!(level = start, error = %e, "start level rejected");
            eprintln!("Level {} could not be loaded: {e}", start + 1);
            return;
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(session, &levels, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(session) => {
            info!(level = session.index(), moves = session.history().len(), "quit");
            println!();
            println!("Thanks for playing Sokoban!");
            println!("Reached level {} of {}", session.index() + 1, levels.len());
        }
        Err(e) => {
            error!(error = %e, "game loop failed");
            eprintln!("Game error: {e}");
        }
    }
}

/// Poll input, apply commands in arrival order, redraw. Returns the final
/// session when the player quits.
fn game_loop(
    mut session: Session,
    levels: &LevelSet,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<Session, Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame = Duration::from_millis(config.frame_ms);

    let mut hud = Hud::new();
    hud.absorb(&[GameEvent::LevelLoaded { index: session.index() }], levels);
    log_placement(&session.snapshot(levels), levels);

    loop {
        let (cols, rows) = renderer.size();
        kb.drain_events(cols, rows);
        gp.update();

        for &action in kb.actions().iter().chain(gp.actions()) {
            match action {
                Action::Quit => return Ok(session),
                Action::Play(command) => {
                    let (next, events) = step::apply(session, command, levels);
                    session = next;
                    hud.absorb(&events, levels);
                    if events.iter().any(|e| matches!(e, GameEvent::LevelLoaded { .. })) {
                        log_placement(&session.snapshot(levels), levels);
                    }
                }
            }
        }

        hud.tick(Instant::now());
        renderer.render(&session.snapshot(levels), &hud, gp.connected)?;
        std::thread::sleep(frame);
    }
}

/// Where the board sits on the configured pixel viewport.
fn log_placement(snap: &Snapshot, levels: &LevelSet) {
    let tile = levels.viewport().tile_size;
    let t = snap.transform;
    let (left, top) = t.tile_origin(0, 0, tile);
    let (right, bottom) = t.tile_origin(snap.width, snap.height, tile);
    debug!(
        level = snap.level_index,
        scale = t.scale,
        left, top, right, bottom,
        "board placement"
    );
}
