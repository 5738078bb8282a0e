//! Tracing setup for the CLI.
//!
//! Progress goes to stderr so stdout stays reserved for command output
//! (prompts in dry-run mode, the created PR URL). Verbosity is controlled
//! with `RUST_LOG`; the default is `info`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
