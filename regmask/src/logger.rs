//! Logger setup for the `regmask` binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialises `env_logger` on stderr.
///
/// `level` overrides the default filter. `RUST_LOG` still applies on top when
/// no override is given. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
