//! Tracing initialization for the pokefusion service

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence; otherwise `pokefusion=debug,info` when
/// verbose, `pokefusion=info,warn` when not. Safe to call more than once;
/// later calls are no-ops.
pub fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("pokefusion=debug,info")
            } else {
                EnvFilter::try_new("pokefusion=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_target(true))
        .try_init();
}
