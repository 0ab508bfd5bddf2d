// Logging setup for the CLI
//
// Library crates log through the `log` facade; the fmt subscriber forwards
// those records. Everything goes to stderr so stdout stays machine-readable.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the subscriber. `RUST_LOG` sets the filter (default: warn);
/// `verbose` forces debug.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let result = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = result {
        eprintln!("warning: logging disabled: {}", e);
    }
}
