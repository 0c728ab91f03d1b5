// src/logging.rs
// =============================================================================
// Diagnostic logging.
//
// Logs go to stderr so stdout only carries the report (important for --json).
// RUST_LOG wins when it is set; otherwise -v / -vv pick the level.
// =============================================================================

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "locale_link_check=info",
        _ => "locale_link_check=debug",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // try_init: a second call (e.g. from tests) is not an error worth failing on
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
