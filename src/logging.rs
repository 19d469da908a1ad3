//! Tracing subscriber setup for binaries and tests embedding the engine.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a console subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive` (e.g. `"report_engine=info"`).
///
/// Safe to call repeatedly; only the first call has an effect, and an already
/// installed global subscriber is left in place.
pub fn init_logging(default_directive: &str) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_logging("report_engine=debug");
        init_logging("report_engine=trace");
        tracing::debug!("logging initialised");
    }
}
