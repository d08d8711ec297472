//! Logging setup for the binary.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let installed = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(filter)
            .try_init();
        if let Err(e) = installed {
            eprintln!("logging already initialised: {e}");
        }
    });
}
