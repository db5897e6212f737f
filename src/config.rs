/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems found while loading are kept in `warnings` and logged once the
/// subscriber is up, since logging itself is configured here.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::level::Viewport;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub start_level: usize,
    pub frame_ms: u64,
    pub viewport: Viewport,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub undo: Vec<String>,
    pub next_level: Vec<String>,
    pub previous_level: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogConfig {
    pub enabled: bool,
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    start_level: usize,
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_viewport_width")]
    viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    viewport_height: f64,
    #[serde(default = "default_tile_size")]
    tile_size: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_undo")]
    undo: Vec<String>,
    #[serde(default = "default_next_level")]
    next_level: Vec<String>,
    #[serde(default = "default_previous_level")]
    previous_level: Vec<String>,
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_enabled")]
    enabled: bool,
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }
fn default_viewport_width() -> f64 { 1900.0 }
fn default_viewport_height() -> f64 { 1000.0 }
fn default_tile_size() -> f64 { 64.0 }

fn default_undo() -> Vec<String> { vec!["B".into()] }
fn default_next_level() -> Vec<String> { vec!["R1".into()] }
fn default_previous_level() -> Vec<String> { vec!["L1".into()] }
fn default_quit() -> Vec<String> { vec!["Select".into()] }

fn default_log_enabled() -> bool { true }
fn default_log_file() -> String { "sokoban.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            start_level: 0,
            frame_ms: default_frame_ms(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            tile_size: default_tile_size(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            undo: default_undo(),
            next_level: default_next_level(),
            previous_level: default_previous_level(),
            quit: default_quit(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            enabled: default_log_enabled(),
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let mut warnings = vec![];
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        GameConfig::from_toml(toml_cfg, warnings)
    }

    /// Parse config text directly. A parse error yields the defaults plus
    /// a warning.
    pub fn from_toml_str(text: &str) -> Self {
        let mut warnings = vec![];
        let toml_cfg = parse_toml(text, "config.toml", &mut warnings);
        GameConfig::from_toml(toml_cfg, warnings)
    }

    fn from_toml(toml_cfg: TomlConfig, mut warnings: Vec<String>) -> Self {
        let mut viewport = Viewport {
            width: toml_cfg.display.viewport_width,
            height: toml_cfg.display.viewport_height,
            tile_size: toml_cfg.display.tile_size,
        };
        if !(viewport.width > 0.0 && viewport.height > 0.0 && viewport.tile_size > 0.0) {
            warnings.push(format!(
                "display sizes must be positive (got {}x{}, tile {}), using defaults",
                viewport.width, viewport.height, viewport.tile_size,
            ));
            viewport = Viewport::default();
        }

        GameConfig {
            start_level: toml_cfg.general.start_level,
            frame_ms: toml_cfg.general.frame_ms.max(1),
            viewport,
            gamepad: GamepadConfig {
                undo: toml_cfg.gamepad.undo,
                next_level: toml_cfg.gamepad.next_level,
                previous_level: toml_cfg.gamepad.previous_level,
                quit: toml_cfg.gamepad.quit,
            },
            log: LogConfig {
                enabled: toml_cfg.log.enabled,
                file: PathBuf::from(toml_cfg.log.file),
                level: toml_cfg.log.level,
            },
            warnings,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text, &path.display().to_string(), warnings),
                Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, origin: &str, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{origin} parse error, using default settings: {e}"));
            TomlConfig::default()
        }
    }
}
