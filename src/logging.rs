/// Tracing setup.
///
/// The terminal is in raw mode on the alternate screen while the game runs,
/// so log output goes to a file instead of stderr. The filter comes from the
/// config, not from the environment.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

pub fn init(cfg: &LogConfig) -> std::io::Result<()> {
    if !cfg.enabled {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(&cfg.file)?;
    let filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();

    Ok(())
}
