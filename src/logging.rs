//! Terminal logging for the binary.

use anyhow::Result;
use simplelog::{ColorChoice, Config, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use crate::download::Diagnostics;

/// Log targets that reach the terminal. `reqwest` carries the wire trace
/// (`reqwest::connect::verbose`); hyper and rustls internals stay silent.
const ALLOWED_TARGETS: [&str; 2] = ["dataset_fetch", "reqwest"];

pub fn level_for(diagnostics: Diagnostics) -> LevelFilter {
    if diagnostics.wire_trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

pub fn config() -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Debug);

    for target in ALLOWED_TARGETS {
        builder.add_filter_allow_str(target);
    }

    builder.build()
}

pub fn init_terminal(diagnostics: Diagnostics) -> Result<()> {
    TermLogger::init(
        level_for(diagnostics),
        config(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    Ok(())
}
