//! Structured logging
//!
//! Wraps `tracing-subscriber` with environment-based level control.
//! `RUST_LOG` takes precedence over the level passed in.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log target for everything the page itself reports
pub const PAGE_TARGET: &str = "uishots::page";

/// Initialize the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    };
}
